fn main() {
    if let Err(err) = devcycle_cli::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
