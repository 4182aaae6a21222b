use clap::Command;
use machine_flags_core::clap_flags::{MatchesCommandLine, register};
use machine_flags_core::{
    BoolFlag, DriverFlagSet, FlagDescriptor, FlagValue, IntFlag, MapCommandLine, StringFlag,
    StringSliceFlag, convert_flags, driver_options, validate_swarm_discovery,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn provisioning_flags() -> Vec<FlagDescriptor> {
    vec![
        BoolFlag::new("enable-ssl")
            .with_usage("Enable SSL")
            .with_value(true)
            .into(),
        IntFlag::new("retries")
            .with_usage("Number of retries")
            .with_value(3)
            .into(),
        StringSliceFlag::new("tags")
            .with_usage("Resource tags")
            .with_value(vec!["a".into(), "b".into()])
            .into(),
    ]
}

fn parse(descriptors: &[FlagDescriptor], args: &[&str]) -> clap::ArgMatches {
    let flags = convert_flags(descriptors).unwrap();
    let argv = std::iter::once("create").chain(args.iter().copied());
    register(Command::new("create"), &flags)
        .try_get_matches_from(argv)
        .unwrap()
}

// ---------------------------------------------------------------------------
// Conversion and extraction are decoupled
// ---------------------------------------------------------------------------

#[test]
fn test_convert_then_extract_without_overrides_yields_zero_values() {
    let descriptors = provisioning_flags();

    let flags = convert_flags(&descriptors).unwrap();
    assert_eq!(flags[0].default, FlagValue::Bool(true));
    assert_eq!(flags[1].default, FlagValue::Int(3));
    assert_eq!(
        flags[2].default,
        FlagValue::StringSlice(vec!["a".into(), "b".into()])
    );

    let opts = driver_options(&MapCommandLine::new(), &descriptors);
    assert!(!opts.bool("enable-ssl"));
    assert_eq!(opts.int("retries"), 0);
    assert!(opts.string_slice("tags").is_empty());
}

#[test]
fn test_mixed_accessor_paths_in_one_batch() {
    let descriptors: Vec<FlagDescriptor> = vec![
        StringFlag::new("region").into(),
        StringSliceFlag::new("security-group").into(),
        BoolFlag::new("private-address-only").into(),
    ];
    let cmd = MapCommandLine::new()
        .with_value("region", FlagValue::String("us-west-2".into()))
        .with_string_slice("security-group", ["docker-machine", "web"])
        .with_value("private-address-only", FlagValue::Bool(true));

    let opts = driver_options(&cmd, &descriptors);

    assert_eq!(opts.string("region"), "us-west-2");
    assert_eq!(opts.string_slice("security-group"), ["docker-machine", "web"]);
    assert!(opts.bool("private-address-only"));
}

// ---------------------------------------------------------------------------
// Through clap
// ---------------------------------------------------------------------------

#[test]
fn test_clap_defaults_flow_into_driver_options() {
    let descriptors = provisioning_flags();
    let matches = parse(&descriptors, &[]);

    let opts = driver_options(&MatchesCommandLine::new(&matches), &descriptors);

    assert!(opts.bool("enable-ssl"));
    assert_eq!(opts.int("retries"), 3);
    assert_eq!(opts.string_slice("tags"), ["a", "b"]);
}

#[test]
fn test_clap_arguments_override_defaults() {
    let descriptors = provisioning_flags();
    let matches = parse(
        &descriptors,
        &["--enable-ssl=false", "--retries", "7", "--tags", "prod"],
    );

    let opts = driver_options(&MatchesCommandLine::new(&matches), &descriptors);

    assert!(!opts.bool("enable-ssl"));
    assert_eq!(opts.int("retries"), 7);
    assert_eq!(opts.string_slice("tags"), ["prod"]);
}

#[test]
fn test_clap_unset_string_without_default_is_empty() {
    let descriptors: Vec<FlagDescriptor> = vec![
        StringFlag::new("ssh-user").into(),
        StringSliceFlag::new("engine-opt").into(),
    ];
    let matches = parse(&descriptors, &[]);

    let opts = driver_options(&MatchesCommandLine::new(&matches), &descriptors);

    assert_eq!(opts.get("ssh-user"), Some(&FlagValue::String(String::new())));
    assert_eq!(opts.get("engine-opt"), Some(&FlagValue::StringSlice(Vec::new())));
}

// ---------------------------------------------------------------------------
// Flag sets
// ---------------------------------------------------------------------------

#[test]
fn test_flag_set_file_registers_and_extracts() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("digitalocean.yml");
    std::fs::write(
        &path,
        r#"
driver: digitalocean
flags:
  - type: string
    name: digitalocean-region
    usage: Digital Ocean region
    value: nyc3
  - type: bool
    name: digitalocean-ipv6
    usage: enable ipv6 for droplet
  - type: int
    name: digitalocean-ssh-port
    value: 22
"#,
    )
    .unwrap();

    let set = DriverFlagSet::load(&path).unwrap();
    let flags = set.to_cli_flags().unwrap();
    let matches = register(Command::new("create"), &flags)
        .try_get_matches_from(["create", "--digitalocean-ipv6", "--digitalocean-ssh-port", "2222"])
        .unwrap();

    let opts = driver_options(&MatchesCommandLine::new(&matches), &set.flags);

    assert_eq!(opts.string("digitalocean-region"), "nyc3");
    assert!(opts.bool("digitalocean-ipv6"));
    assert_eq!(opts.int("digitalocean-ssh-port"), 2222);
}

// ---------------------------------------------------------------------------
// Discovery
// ---------------------------------------------------------------------------

#[test]
fn test_discovery_examples() {
    assert!(validate_swarm_discovery("").is_ok());
    assert!(validate_swarm_discovery("token://deadbeefcafe").is_ok());
    assert!(validate_swarm_discovery("foo").is_err());
}
