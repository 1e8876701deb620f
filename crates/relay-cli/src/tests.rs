use super::*;

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["relay-cli"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn parses_list_with_default_limit() {
    let cli = Cli::try_parse_from(["relay-cli", "list"]).expect("expected valid cli args");
    assert!(matches!(cli.command, Some(Commands::List { limit: 10 })));
}

#[test]
fn parses_translate_defaults() {
    let cli = Cli::try_parse_from(["relay-cli", "translate", "https://allmuffins.com/chocolate-muffins/"])
        .expect("expected valid cli args");
    let Some(Commands::Translate {
        url,
        langs,
        save,
        publish,
        status,
        placeholders,
    }) = cli.command
    else {
        panic!("expected translate command");
    };
    assert_eq!(url, "https://allmuffins.com/chocolate-muffins/");
    assert_eq!(langs, vec!["fr", "es"]);
    assert!(!save);
    assert!(!publish);
    assert_eq!(status, PostStatus::Draft);
    assert_eq!(placeholders, 0);
}

#[test]
fn parses_translate_with_all_flags() {
    let cli = Cli::try_parse_from([
        "relay-cli",
        "translate",
        "https://allmuffins.com/x/",
        "--langs",
        "de",
        "sv",
        "--save",
        "--publish",
        "--status",
        "pending",
        "--placeholders",
        "3",
    ])
    .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Translate {
            ref langs,
            save: true,
            publish: true,
            status: PostStatus::Pending,
            placeholders: 3,
            ..
        }) if langs == &["de", "sv"]
    ));
}

#[test]
fn rejects_unknown_status() {
    assert!(Cli::try_parse_from([
        "relay-cli",
        "translate",
        "https://allmuffins.com/x/",
        "--status",
        "live",
    ])
    .is_err());
}

#[test]
fn parses_batch_defaults() {
    let cli = Cli::try_parse_from(["relay-cli", "batch"]).expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Some(Commands::Batch { count: 5, ref langs }) if langs == &["fr"]
    ));
}

#[test]
fn check_languages_rejects_unknown_codes() {
    let locales = relay_core::default_locales();
    assert!(check_languages(locales, &["fr".to_string(), "de".to_string()]).is_ok());
    let err = check_languages(locales, &["fr".to_string(), "it".to_string()])
        .expect_err("italian is not configured");
    assert!(err.to_string().contains("it"));
}
