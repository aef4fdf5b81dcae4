use quadcg::OptimizerDriver;
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};

fn main() -> Result<(), String> {
    TermLogger::init(
        LevelFilter::Debug,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )
    .map_err(|error| format!("{error}"))?;

    let optimizer = OptimizerDriver::<f64>::new();
    let (x, value, gradient_norm) = optimizer
        .execute()
        .map_err(|error| format!("{error}"))?
        .into_parts();

    println!(
        "=====Function F(X1, X2) has a local minimum at {:?}=========",
        x.as_slice()
    );
    println!("  - Min Value = {}", value);
    println!("  - Slope     = {}", gradient_norm);

    Ok(())
}
