use pauseroom_core::validate_settings;

pub fn run(duration: u64, frequency: u64) -> Result<(), Box<dyn std::error::Error>> {
    let errors = validate_settings(duration, frequency);
    if errors.is_empty() {
        println!("ok");
        return Ok(());
    }
    for error in &errors {
        println!("{error}");
    }
    std::process::exit(1);
}
