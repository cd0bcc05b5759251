fn main() {
    tracing_subscriber::fmt::init();
    if let Err(error) = array_viewer::run_cli() {
        eprintln!("{error}");
        std::process::exit(1);
    }
}
