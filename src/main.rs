use anyhow::Context;
use log::info;

use mnist_autoencoder::{SessionConfig, TrainingSession};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = SessionConfig::from_env().context("loading the configuration")?;
    info!("loading MNIST from {}", config.data_dir.display());

    let mut session = TrainingSession::from_config(config).context("setting up the session")?;
    let report = session.run().context("running the session")?;

    let reconstruction = &report.reconstruction;
    info!(
        "logged {} training checkpoints, reconstructed {} test images",
        report.stats.len(),
        reconstruction.originals.nrows()
    );

    for (i, (orig, rec)) in reconstruction
        .originals
        .rows()
        .into_iter()
        .zip(reconstruction.reconstructed.rows())
        .enumerate()
    {
        let diff = (&orig - &rec).mapv(f32::abs).mean().unwrap_or_default();
        println!("Image {i}: mean absolute reconstruction difference {diff:.2}");
    }

    Ok(())
}
