//! Generate a portfolio, store it, read it back and look for its clusters.
//!
//! Run with `RUST_LOG=debug` to see per-run details.

use policy_clusters::data::io::{load_dataset, save_dataset};
use policy_clusters::data::Generator;
use policy_clusters::explore::Exploration;

fn main() -> policy_clusters::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let path = std::env::temp_dir().join("policy_clusters.csv");
    let dataset = Generator::default().with_seed(42).generate()?;
    save_dataset(&dataset, &path)?;
    println!("wrote {} policies to {}", dataset.len(), path.display());

    let loaded = load_dataset(&path)?;
    let report = Exploration::default().run(&loaded)?;
    println!("excluded {} policies with missing age", report.excluded);

    for run in &report.runs {
        println!(
            "\n=== {} / {:?} (k={}, inertia {:.3}) ===",
            run.scope,
            run.scaling,
            run.fit.k(),
            run.fit.inertia
        );
        let sizes = run.fit.cluster_sizes();
        for (i, center) in run.centers_in_original_units()?.iter().enumerate() {
            println!(
                "  cluster {}: age {:5.1}, sum assured {:10.0}, {} policies",
                i + 1,
                center[0],
                center[1],
                sizes[i]
            );
        }
    }
    Ok(())
}
