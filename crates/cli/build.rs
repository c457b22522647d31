use std::{env, fs, path::PathBuf};

fn pool_args(cmd: clap::Command) -> clap::Command {
    cmd.arg(clap::arg!(--workers <N> "Worker threads (default: available parallelism)"))
        .arg(clap::arg!(--"queue-depth" <N> "Documents submitted to the pool per round"))
}

fn rules_args(cmd: clap::Command) -> clap::Command {
    cmd.arg(
        clap::arg!(--rules <FILE> "Extra rules file, applied after discovered ones")
            .value_parser(clap::value_parser!(std::path::PathBuf)),
    )
    .arg(
        clap::arg!(--"rules-dir" <DIR> "Rules directory to search instead of the default locations")
            .value_parser(clap::value_parser!(std::path::PathBuf)),
    )
}

fn output_arg() -> clap::Arg {
    clap::arg!(-o --output <FILE> "Output file (default: stdout)")
        .value_name("FILE")
        .value_parser(clap::value_parser!(std::path::PathBuf))
}

fn profile_arg() -> clap::Arg {
    clap::arg!(--profile <PROFILE> "Rule table (plaintext, crawl)").value_parser(["plaintext", "crawl"])
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=OUT_DIR");

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let completions_dir = out_dir.join("completions");

    fs::create_dir_all(&completions_dir).unwrap();

    let normalize = clap::Command::new("normalize")
        .about("Normalize a directory of plaintext documents")
        .arg(clap::arg!(<DIR> "Directory containing the documents"))
        .arg(output_arg())
        .arg(clap::arg!(--ext <EXT> "File extension to pick up").default_value("txt"))
        .arg(profile_arg());

    let crawl = clap::Command::new("crawl")
        .about("Normalize a JSON-lines crawler feed")
        .arg(clap::arg!(<FEED> "JSON-lines feed of crawled pages"))
        .arg(output_arg());

    let repair = clap::Command::new("repair")
        .about("Validate a record file and repair unescaped content values")
        .arg(clap::arg!(<INPUT> "Record file to validate"))
        .arg(clap::arg!(-o --output <OUTPUT> "File receiving valid and repaired lines").required(true));

    let inspect = clap::Command::new("inspect")
        .about("Normalize one document and print the record")
        .arg(clap::arg!(<FILE> "Plaintext document, or '-' for stdin"))
        .arg(profile_arg());

    let mut cmd = clap::Command::new("docnorm")
        .version(env!("CARGO_PKG_VERSION"))
        .author("docnorm Contributors")
        .about("Normalize harvested documentation into JSON-lines records")
        .arg(clap::arg!(-v --verbose "Enable debug logging").global(true))
        .arg(
            clap::arg!(--completions <SHELL> "Generate shell completion script")
                .value_name("SHELL")
                .value_parser(["bash", "elvish", "fish", "powershell", "zsh"]),
        )
        .subcommand(rules_args(pool_args(normalize)))
        .subcommand(rules_args(pool_args(crawl)))
        .subcommand(repair)
        .subcommand(rules_args(inspect));

    clap_complete::generate_to(clap_complete::shells::Bash, &mut cmd, "docnorm", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::Zsh, &mut cmd, "docnorm", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::Fish, &mut cmd, "docnorm", &completions_dir).unwrap();
    clap_complete::generate_to(clap_complete::shells::PowerShell, &mut cmd, "docnorm", &completions_dir).unwrap();

    println!("cargo:warning=Shell completions generated in: {}", completions_dir.display());
}
