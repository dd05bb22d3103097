//! Tests for the domain user model.

use super::*;
use rstest::{fixture, rstest};
use serde_json::json;

const VALID_ID: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

#[fixture]
fn ana() -> User {
    User::new(
        UserId::new(VALID_ID).expect("fixture id"),
        Username::new("ana").expect("fixture username"),
        CredentialHash::new("$argon2id$v=19$stub").expect("fixture hash"),
        Role::Player,
        DateTime::<Utc>::UNIX_EPOCH,
    )
}

#[rstest]
#[case("", UserValidationError::EmptyId)]
#[case("not-a-uuid", UserValidationError::InvalidId)]
#[case(" 3fa85f64-5717-4562-b3fc-2c963f66afa6", UserValidationError::InvalidId)]
fn user_id_rejects_invalid_input(#[case] raw: &str, #[case] expected: UserValidationError) {
    let err = UserId::new(raw).expect_err("invalid id must fail");
    assert_eq!(err, expected);
}

#[rstest]
fn user_id_preserves_raw_text() {
    let id = UserId::new(VALID_ID).expect("valid id");
    assert_eq!(id.as_ref(), VALID_ID);
    assert_eq!(id.as_uuid().to_string(), VALID_ID);
}

#[rstest]
#[case("", UserValidationError::EmptyUsername)]
#[case("   ", UserValidationError::EmptyUsername)]
#[case("ab", UserValidationError::UsernameTooShort { min: USERNAME_MIN })]
#[case("bad name", UserValidationError::UsernameInvalidCharacters)]
#[case("bad$char", UserValidationError::UsernameInvalidCharacters)]
fn username_rejects_invalid_input(#[case] raw: &str, #[case] expected: UserValidationError) {
    let err = Username::new(raw).expect_err("invalid username must fail");
    assert_eq!(err, expected);
}

#[rstest]
fn username_rejects_overlong_input() {
    let err = Username::new("a".repeat(USERNAME_MAX + 1)).expect_err("too long");
    assert_eq!(err, UserValidationError::UsernameTooLong { max: USERNAME_MAX });
}

#[rstest]
#[case("ana")]
#[case("Ana")]
#[case("player_one.eu-west")]
fn username_accepts_valid_input(#[case] raw: &str) {
    let username = Username::new(raw).expect("valid username");
    assert_eq!(username.as_ref(), raw);
}

#[rstest]
fn usernames_are_case_sensitive() {
    let lower = Username::new("ana").expect("valid");
    let upper = Username::new("ANA").expect("valid");
    assert_ne!(lower, upper);
}

#[rstest]
fn credential_hash_rejects_blank_input() {
    let err = CredentialHash::new("  ").expect_err("blank hash must fail");
    assert_eq!(err, UserValidationError::EmptyCredentialHash);
}

#[rstest]
fn credential_hash_debug_is_redacted() {
    let hash = CredentialHash::new("secret-hash").expect("valid hash");
    let rendered = format!("{hash:?}");
    assert!(!rendered.contains("secret-hash"));
}

#[rstest]
#[case("player", Role::Player)]
#[case("admin", Role::Admin)]
fn role_parses_storage_values(#[case] raw: &str, #[case] expected: Role) {
    let role: Role = raw.parse().expect("known role");
    assert_eq!(role, expected);
    assert_eq!(role.as_str(), raw);
}

#[rstest]
fn role_rejects_unknown_values() {
    let err = "owner".parse::<Role>().expect_err("unknown role");
    assert_eq!(
        err,
        UserValidationError::UnknownRole {
            value: "owner".to_owned()
        }
    );
}

#[rstest]
fn only_players_hold_scores() {
    assert!(Role::Player.holds_scores());
    assert!(!Role::Admin.holds_scores());
}

#[rstest]
fn user_serialisation_omits_credential_hash(ana: User) {
    let value = serde_json::to_value(&ana).expect("serialise user");
    assert_eq!(
        value,
        json!({
            "id": VALID_ID,
            "username": "ana",
            "role": "player",
            "createdAt": "1970-01-01T00:00:00Z",
        })
    );
}

#[rstest]
fn new_user_generates_distinct_ids() {
    let username = Username::new("ana").expect("valid");
    let hash = CredentialHash::new("hash").expect("valid");
    let first = NewUser::new(username.clone(), hash.clone(), Role::Player);
    let second = NewUser::new(username, hash, Role::Player);
    assert_ne!(first.id, second.id);
}
