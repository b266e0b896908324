use std::env;
use std::error::Error;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use gridsmoother::configuration::FitConfiguration;
use gridsmoother::distribution::densityscale::DensityScale;
use gridsmoother::distribution::griddistribution::GridDistribution;
use gridsmoother::fit::constraint::{
    MassConstraint,
    MomentConstraint
};
use gridsmoother::fit::maxentropyfitter::MaxEntropyFitter;
use gridsmoother::fit::smoothingfitter::SmoothingFitter;

fn summarize(name: &str, dist: &GridDistribution) {
    println!("{}: mean {:.4}, std {:.4}, median {:.4}, entropy {:.4}",
             name,
             dist.mean(),
             dist.std(),
             dist.median(),
             dist.entropy());
    let quantiles = dist.ppf_many(&[0.05, 0.25, 0.5, 0.75, 0.95]);
    println!("{}: quantiles {:?}", name, quantiles);
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    // 第一個參數為設定檔路徑，未提供則使用預設值
    let configuration = match env::args().nth(1) {
        Some(path) => FitConfiguration::from_reader(path)?,
        None => FitConfiguration::new(),
    };

    let mut smoothed = GridDistribution::default();
    let inner_mass = MassConstraint::new(-1.0, 1.0, 0.9);
    let centered = MomentConstraint::new(0.0, 1);
    SmoothingFitter::new(configuration.clone())
        .fit_entropy(&mut smoothed, -3.0, 3.0, &[&inner_mass, &centered], 50)?;
    summarize("smoothing", &smoothed);
    println!("smoothing: mass in [-1, 1] = {:.4}", inner_mass.current_mass(&smoothed));

    let mut normal = GridDistribution::default();
    let mu = 0.0;
    let sigma2 = 1.0;
    let first = |x: f64| x;
    let second = move |x: f64| (x - mu) * (x - mu);
    let funcs: [&dyn Fn(f64) -> f64; 2] = [&first, &second];
    let report = MaxEntropyFitter::new(configuration)
        .fit(&mut normal, -3.0, 3.0, &funcs, &[mu, sigma2], 50)?;
    summarize("max-entropy", &normal);
    println!("max-entropy: multipliers {:?}", report.multipliers());

    let mut rng = StdRng::seed_from_u64(7);
    println!("max-entropy: samples {:?}", normal.rvs(5, &mut rng));

    let state = normal.dump()?;
    let restored = GridDistribution::load(&state, DensityScale::UnitSpan)?;
    println!("round trip exact: {}", restored == normal);
    println!("{}", state);
    Ok(())
}
