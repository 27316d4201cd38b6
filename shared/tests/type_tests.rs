/// Integration-level tests for the `tollgate-shared` crate.
///
/// Each section tests one module; unit tests that are tightly coupled to
/// private helpers live inside the modules themselves (see the `#[cfg(test)]`
/// block in `server_config.rs`).
// ---------------------------------------------------------------------------
// Credential claims
// ---------------------------------------------------------------------------
#[cfg(test)]
mod claims_tests {
    use tollgate_shared::types::*;

    #[test]
    fn claims_serialize_with_registered_names() {
        let claims = CredentialClaims {
            sub: "uid_1314520".to_string(),
            iat: 1_700_000_000,
            exp: 1_700_003_600,
        };
        let json = serde_json::to_value(&claims).unwrap();
        assert_eq!(json["sub"], "uid_1314520");
        assert_eq!(json["iat"], 1_700_000_000u64);
        assert_eq!(json["exp"], 1_700_003_600u64);
        assert_eq!(json.as_object().unwrap().len(), 3);
    }
}

// ---------------------------------------------------------------------------
// Fragment set
// ---------------------------------------------------------------------------
#[cfg(test)]
mod fragment_set_tests {
    use tollgate_shared::types::*;

    fn sample() -> FragmentSet {
        FragmentSet {
            a: "payload".to_string(),
            b: "header".to_string(),
            c: "signature".to_string(),
            decoy: DECOY_VALUE.to_string(),
        }
    }

    #[test]
    fn serializes_under_the_wire_labels() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["asdw"], "payload");
        assert_eq!(json["ydts"], "header");
        assert_eq!(json["klia"], "signature");
        assert_eq!(json["yoka"], DECOY_VALUE);
    }

    #[test]
    fn cookie_header_lists_all_four_labels() {
        let header = sample().to_cookie_header();
        assert_eq!(
            header,
            format!("asdw=payload; ydts=header; klia=signature; yoka={}", DECOY_VALUE)
        );
    }

    #[test]
    fn map_is_keyed_by_label() {
        let map = sample().to_map();
        assert_eq!(map.len(), 4);
        assert_eq!(map[LABEL_B], "header");
        assert_eq!(map[LABEL_DECOY], DECOY_VALUE);
    }

    #[test]
    fn decoy_looks_like_a_segment() {
        assert!(
            DECOY_VALUE
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
        assert!(!DECOY_VALUE.contains('.'));
    }
}

// ---------------------------------------------------------------------------
// Response bodies
// ---------------------------------------------------------------------------
#[cfg(test)]
mod response_tests {
    use tollgate_shared::types::*;

    #[test]
    fn reply_without_data_omits_the_field() {
        let json = serde_json::to_string(&ApiReply::message("Please log in first", 201)).unwrap();
        assert_eq!(json, r#"{"msg":"Please log in first","code":201}"#);
    }

    #[test]
    fn reply_with_data_nests_it() {
        let json = serde_json::to_value(ApiReply::ok("Success", vec![1, 2])).unwrap();
        assert_eq!(json["code"], 200);
        assert_eq!(json["data"], serde_json::json!([1, 2]));
    }

    #[test]
    fn login_required_body_is_stable() {
        let json = serde_json::to_string(&ErrorResponse::login_required()).unwrap();
        assert_eq!(
            json,
            r#"{"status":"error","code":"LOGIN_REQUIRED","message":"Please log in first"}"#
        );
    }
}

// ---------------------------------------------------------------------------
// User payloads
// ---------------------------------------------------------------------------
#[cfg(test)]
mod user_tests {
    use tollgate_shared::types::*;

    #[test]
    fn registration_accepts_numeric_or_textual_sex() {
        let numeric: RegistrationData = serde_json::from_str(r#"{"phone":"1","sex":0}"#).unwrap();
        let textual: RegistrationData =
            serde_json::from_str(r#"{"phone":"1","sex":"1"}"#).unwrap();
        let blank: RegistrationData = serde_json::from_str(r#"{"phone":"1","sex":""}"#).unwrap();
        let absent: RegistrationData = serde_json::from_str(r#"{"phone":"1"}"#).unwrap();

        assert_eq!(numeric.sex, Some(0));
        assert_eq!(textual.sex, Some(1));
        assert_eq!(blank.sex, None);
        assert_eq!(absent.sex, None);
    }

    #[test]
    fn registration_rejects_non_numeric_sex() {
        assert!(serde_json::from_str::<RegistrationData>(r#"{"phone":"1","sex":"male"}"#).is_err());
    }

    #[test]
    fn sex_outside_the_column_domain_is_rejected() {
        assert!(serde_json::from_str::<RegistrationData>(r#"{"phone":"1","sex":3}"#).is_err());
        assert!(serde_json::from_str::<RegistrationData>(r#"{"phone":"1","sex":"7"}"#).is_err());
        assert!(serde_json::from_str::<SexFilter>(r#"{"sex":255}"#).is_err());

        let unknown: RegistrationData = serde_json::from_str(r#"{"phone":"1","sex":2}"#).unwrap();
        assert_eq!(unknown.sex, Some(user::SEX_UNKNOWN));
    }

    #[test]
    fn sex_filter_defaults_to_none() {
        let filter: SexFilter = serde_json::from_str("{}").unwrap();
        assert_eq!(filter.sex, None);
    }

    #[test]
    fn update_requires_both_fields() {
        assert!(serde_json::from_str::<PhoneUpdate>(r#"{"phone":"1"}"#).is_err());
        let ok: PhoneUpdate = serde_json::from_str(r#"{"user_id":"u","phone":"1"}"#).unwrap();
        assert_eq!(ok.user_id, "u");
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------
#[cfg(test)]
mod config_tests {
    use std::io::Write;

    use tempfile::NamedTempFile;
    use tollgate_shared::config::{load_config, validate_config};
    use tollgate_shared::types::*;

    const SECRET_LINE: &str = r#"jwt_secret = "0123456789abcdef0123456789abcdef""#;

    fn write_config(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_a_full_document() {
        let file = write_config(&format!(
            r#"
            [server]
            bind = "0.0.0.0"
            port = 9000

            [session]
            cookie_name = "sid"
            window_secs = 600
            same_site = "Strict"

            [hosts]
            allowed = ["127.0.0.1", "localhost"]
            request_identity = "tester"

            [auth]
            {SECRET_LINE}
            protected_paths = ["/cookie"]

            [mail]
            to = ["a@example.com"]
            "#
        ));

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.server.addr(), "0.0.0.0:9000");
        assert_eq!(config.session.cookie_name, "sid");
        assert_eq!(config.hosts.allowed.len(), 2);
        assert_eq!(config.auth.protected_paths, vec!["/cookie"]);
        assert_eq!(config.auth.credential_lifetime_secs, 3600);
        assert_eq!(config.mail.to, vec!["a@example.com"]);
    }

    #[test]
    fn empty_file_is_rejected() {
        let file = write_config("   \n");
        assert!(matches!(
            load_config(file.path()),
            Err(ConfigError::InvalidConfig(_))
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        assert!(matches!(
            load_config("/definitely/not/here.toml"),
            Err(ConfigError::Io(_))
        ));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let file = write_config("[server\nport = 1");
        assert!(matches!(
            load_config(file.path()),
            Err(ConfigError::TomlParse(_))
        ));
    }

    #[test]
    fn zero_window_is_invalid() {
        let mut config = AppConfig::default();
        config.auth.jwt_secret = Some("0123456789abcdef0123456789abcdef".into());
        config.session.window_secs = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn unknown_same_site_is_invalid() {
        let mut config = AppConfig::default();
        config.auth.jwt_secret = Some("0123456789abcdef0123456789abcdef".into());
        config.session.same_site = "Sometimes".into();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn empty_host_list_is_invalid() {
        let mut config = AppConfig::default();
        config.auth.jwt_secret = Some("0123456789abcdef0123456789abcdef".into());
        config.hosts.allowed.clear();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn relative_protected_path_is_invalid() {
        let mut config = AppConfig::default();
        config.auth.jwt_secret = Some("0123456789abcdef0123456789abcdef".into());
        config.auth.protected_paths = vec!["cookie".into()];
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn defaults_with_secret_are_valid() {
        let mut config = AppConfig::default();
        config.auth.jwt_secret = Some("0123456789abcdef0123456789abcdef".into());
        assert!(validate_config(&config).is_ok());
    }
}
