fn main() {
    // Load .env early; ignore if missing.
    dotenvy::dotenv().ok();

    if let Err(err) = grafana_dashboards::run() {
        eprintln!("{}", err.to_json());
        std::process::exit(err.code);
    }
}
