use gmmbench::RunMetrics;

fn main() {
    match gmmbench::run() {
        Ok(RunMetrics::Measured { .. }) => {}
        Ok(RunMetrics::Failed(_)) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    }
}
