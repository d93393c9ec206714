use voxgate::domain::{IdentityError, SpeakerIdentity};

#[test]
fn given_plain_username_when_parsing_then_accepts_trimmed_value() {
    let identity = SpeakerIdentity::parse("  alice_01 ").unwrap();

    assert_eq!(identity.as_str(), "alice_01");
    assert_eq!(identity.to_string(), "alice_01");
}

#[test]
fn given_blank_username_when_parsing_then_returns_empty() {
    assert_eq!(SpeakerIdentity::parse(" \t"), Err(IdentityError::Empty));
}

#[test]
fn given_path_separator_when_parsing_then_rejects_character() {
    assert_eq!(
        SpeakerIdentity::parse("../etc/passwd"),
        Err(IdentityError::ForbiddenCharacter('/'))
    );
    assert_eq!(
        SpeakerIdentity::parse("a\\b"),
        Err(IdentityError::ForbiddenCharacter('\\'))
    );
}

#[test]
fn given_parent_reference_when_parsing_then_rejects_relative_component() {
    assert_eq!(
        SpeakerIdentity::parse(".."),
        Err(IdentityError::RelativeComponent)
    );
}

#[test]
fn given_control_character_when_parsing_then_rejects() {
    assert_eq!(
        SpeakerIdentity::parse("bob\nsmith"),
        Err(IdentityError::ForbiddenCharacter('\n'))
    );
}

#[test]
fn given_overlong_username_when_parsing_then_rejects() {
    let name = "x".repeat(129);

    assert_eq!(SpeakerIdentity::parse(&name), Err(IdentityError::TooLong));
}

#[test]
fn given_unicode_username_when_parsing_then_accepts() {
    assert!(SpeakerIdentity::parse("Zoë Ødegård").is_ok());
}
