use skald::presentation::{Environment, Settings};

#[test]
fn given_empty_config_when_loading_defaults_then_documented_values_apply() {
    let settings = Settings::default();

    assert_eq!(settings.server.port, 8000);
    assert_eq!(settings.queue.name, "transcribe");
    assert_eq!(settings.queue.workers, 2);
    assert_eq!(settings.queue.job_timeout_secs, 1800);
    assert_eq!(settings.queue.result_ttl_secs, 3600);
    assert_eq!(settings.transcription.default_model, "large-v3");
    assert_eq!(settings.webhook.timeout_secs, 10);
    assert_eq!(settings.captions.max_line_width, 42);
    assert_eq!(settings.captions.max_line_width_arabic, 32);
    assert_eq!(settings.captions.max_lines, 2);
    assert_eq!(settings.captions.max_lines_arabic, 2);
}

#[test]
fn given_caption_settings_when_resolving_limits_then_fields_carry_over() {
    let settings = Settings::default();
    let limits = settings.captions.limits();

    assert_eq!(limits.for_language("ar").max_line_width, 32);
    assert_eq!(limits.for_language("en").max_line_width, 42);
    assert_eq!(limits.for_language("en").max_line_count, 2);
}

#[test]
fn given_environment_strings_when_parsing_then_aliases_resolve() {
    assert_eq!(
        Environment::try_from("production".to_string()).unwrap(),
        Environment::Prod
    );
    assert_eq!(
        Environment::try_from("LOCAL".to_string()).unwrap(),
        Environment::Local
    );
    assert!(Environment::try_from("staging".to_string()).is_err());
}
