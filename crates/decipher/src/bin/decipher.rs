fn main() {
    if let Err(err) = decipher::run() {
        eprintln!("{}", decipher::format_error(&err));
        std::process::exit(decipher::exit_code(&err));
    }
}
