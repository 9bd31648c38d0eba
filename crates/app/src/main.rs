fn main() {
    if let Err(error) = libshelf::run(std::env::args_os()) {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}
