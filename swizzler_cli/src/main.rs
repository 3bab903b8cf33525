use clap::{App, AppSettings, Arg, SubCommand};
use swizzler_cli::{convert_dds, parse_platform, Command};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let input_arg = Arg::with_name("input")
        .index(1)
        .help("The input dds file")
        .required(true)
        .takes_value(true);

    let output_arg = Arg::with_name("output")
        .index(2)
        .help("The output dds file")
        .required(true)
        .takes_value(true);

    let platform_arg = Arg::with_name("platform")
        .short("p")
        .long("platform")
        .help("The console memory layout")
        .takes_value(true)
        .default_value("ps4")
        .possible_values(&["ps4", "switch"])
        .case_insensitive(true);

    let gobs_height_arg = Arg::with_name("gobs-height")
        .short("g")
        .long("gobs-height")
        .help("The max height of GOB blocks for the Switch. UE games use 8")
        .takes_value(true)
        .default_value("16")
        .possible_values(&["1", "2", "4", "8", "16", "32"]);

    let matches = App::new("swizzler_cli")
        .version(console_swizzler::version())
        .about("Swizzle or unswizzle the image data of DDS files for the PS4 or Switch.")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .subcommand(
            SubCommand::with_name("swizzle")
                .about("Swizzles an input dds")
                .arg(&input_arg)
                .arg(&output_arg)
                .arg(&platform_arg)
                .arg(&gobs_height_arg),
        )
        .subcommand(
            SubCommand::with_name("unswizzle")
                .about("Unswizzles an input dds")
                .arg(&input_arg)
                .arg(&output_arg)
                .arg(&platform_arg)
                .arg(&gobs_height_arg),
        )
        .get_matches();

    let (name, sub_matches) = matches.subcommand();
    let (command, sub_matches) = match (name.parse::<Command>(), sub_matches) {
        (Ok(command), Some(sub_matches)) => (command, sub_matches),
        _ => {
            eprintln!("Unknown command. ({})", name);
            std::process::exit(1);
        }
    };

    // Clap already checks the possible values.
    let input = sub_matches.value_of("input").unwrap();
    let output = sub_matches.value_of("output").unwrap();
    let platform_name = sub_matches.value_of("platform").unwrap().to_lowercase();
    let platform = parse_platform(&platform_name).unwrap();
    let gobs_height: i32 = sub_matches
        .value_of("gobs-height")
        .unwrap()
        .parse()
        .unwrap();

    tracing::info!(platform = %platform_name, gobs_height, "Console Swizzler v{}", console_swizzler::version());

    let start = std::time::Instant::now();
    match convert_dds(input, output, command, platform, gobs_height) {
        Ok(()) => tracing::info!("Done in {:?}.", start.elapsed()),
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}
