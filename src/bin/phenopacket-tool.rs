extern crate getopts;

use std::env;
use std::path::Path;
use std::process;

use getopts::Options;

use tracing_subscriber::EnvFilter;

use phenopackets::codec::{expect_file_format, read_file, write_file, FileFormat};
use phenopackets::config::ValidationConfig;
use phenopackets::{Family, Phenopacket, ValidationError};

const PKG_NAME: &str = env!("CARGO_PKG_NAME");
const VERSION: &str = env!("CARGO_PKG_VERSION");

fn print_usage(program: &str, opts: Options) {
    let brief = format!("Usage: {} [options] FILE

Read a phenopacket (or with --family, a family) from FILE, check its cross
references and optionally write it out again as JSON or binary.  The format
of each file comes from its name: .json, .pb, .bin or .msgpack, optionally
followed by .zst or .gz", program);
    print!("{}", opts.usage(&brief));
}

fn print_violations(container_id: &str, result: &Result<(), ValidationError>) {
    match result {
        Ok(()) => println!("{}: OK", container_id),
        Err(validation_error) => {
            eprintln!("{}: {} problem(s):", container_id, validation_error.len());
            for violation in validation_error.iter() {
                eprintln!("  {}", violation);
            }
        },
    }
}

fn check_file<T>(file_name: &str, validate: impl Fn(&T) -> (String, Result<(), ValidationError>),
                 json_out: Option<String>, binary_out: Option<String>)
                 -> anyhow::Result<bool>
    where T: serde::Serialize + serde::de::DeserializeOwned
{
    let value: T = read_file(file_name)?;

    let (container_id, result) = validate(&value);
    print_violations(&container_id, &result);

    if let Some(json_out) = json_out {
        write_file(&value, &json_out)?;
    }

    if let Some(binary_out) = binary_out {
        write_file(&value, &binary_out)?;
    }

    Ok(result.is_ok())
}

fn main() {
    let args: Vec<String> = env::args().collect();
    let mut opts = Options::new();

    opts.optflag("h", "help", "print this help message");
    opts.optflag("", "version", "print the version and exit");
    opts.optopt("c", "config-file", "Validation configuration file name", "CONFIG");
    opts.optflag("", "family", "FILE contains a Family rather than a Phenopacket");
    opts.optopt("", "json", "Write the input to OUT as JSON", "OUT");
    opts.optopt("", "binary", "Write the input to OUT in the binary format", "OUT");

    let program = args[0].clone();

    let matches = match opts.parse(&args[1..]) {
        Ok(m) => m,
        Err(failure) => {
            eprintln!("{}", failure);
            print_usage(&program, opts);
            process::exit(1);
        }
    };

    if matches.opt_present("help") {
        print_usage(&program, opts);
        process::exit(0);
    }

    if matches.opt_present("version") {
        println!("{} v{}", PKG_NAME, VERSION);
        process::exit(0);
    }

    if matches.free.len() != 1 {
        eprintln!("expected exactly one input file name");
        print_usage(&program, opts);
        process::exit(1);
    }

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new("phenopackets=info"))
                .unwrap(),
        )
        .init();

    let config = match matches.opt_str("config-file") {
        Some(config_file_name) => match ValidationConfig::read(&config_file_name) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("{:#}", err);
                process::exit(1);
            }
        },
        None => ValidationConfig::default(),
    };

    let file_name = &matches.free[0];
    let json_out = matches.opt_str("json");
    let binary_out = matches.opt_str("binary");

    // the extension of each output must agree with its flag
    let outputs = [(&json_out, FileFormat::Json), (&binary_out, FileFormat::Binary)];
    for (out_file_name, format) in outputs {
        if let Some(out_file_name) = out_file_name {
            if let Err(err) = expect_file_format(Path::new(out_file_name), format) {
                eprintln!("{:#}", err);
                process::exit(1);
            }
        }
    }

    let result = if matches.opt_present("family") {
        check_file(file_name,
                   |family: &Family| (family.id().to_owned(), family.validate_with(&config)),
                   json_out, binary_out)
    } else {
        check_file(file_name,
                   |phenopacket: &Phenopacket| {
                       (phenopacket.id().to_owned(), phenopacket.validate_with(&config))
                   },
                   json_out, binary_out)
    };

    match result {
        Ok(true) => (),
        Ok(false) => process::exit(2),
        Err(err) => {
            eprintln!("{:#}", err);
            process::exit(1);
        }
    }
}
