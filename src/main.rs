fn main() {
    if let Err(err) = leadflow_lib::run() {
        eprintln!("leadflow: {err:#}");
        std::process::exit(1);
    }
}
