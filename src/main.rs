use galaxy::Galaxy;

fn main() {
    galaxy::init_logging();

    if let Err(err) = Galaxy::new().run() {
        log::error!("{err}");
        std::process::exit(1);
    }
}
