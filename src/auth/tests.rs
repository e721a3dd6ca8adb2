use super::*;
use axum::body::Body;
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};
use init_data::{InitDataPayload, MAX_AUTH_AGE_SECS, sign_init_data};
use login_widget::{LoginWidgetError, check_string, verify_login_widget};
use session::{SESSION_TTL_SECS, bearer_token, issue_session_token, validate_session_token};
use url::form_urlencoded;

const BOT_TOKEN: &str = "123456:ABC-DEF1234ghIkl-zyx57W2v1u123ew11";
const NOW: i64 = 1_750_000_000;
const USER_JSON: &str = r#"{"id":402695709,"first_name":"Ivan","last_name":"Petrov","username":"ivan","language_code":"ru","is_premium":true}"#;

fn signed_init_data(auth_date: i64) -> String {
    let auth_date = auth_date.to_string();
    let pairs = [
        ("query_id", "AAHdF6IQAAAAAN0XohDhrOrc"),
        ("user", USER_JSON),
        ("auth_date", auth_date.as_str()),
    ];
    let hash = sign_init_data(&pairs, BOT_TOKEN).unwrap();

    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in pairs {
        serializer.append_pair(key, value);
    }
    serializer.append_pair("hash", &hash);
    serializer.finish()
}

fn telegram_gate() -> Arc<AuthGate> {
    Arc::new(AuthGate::new(BOT_TOKEN, AuthMode::Telegram))
}

fn request(gate: Arc<AuthGate>, header: Option<&str>, body: &str) -> Request {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/api/subscription")
        .header("content-type", "application/json")
        .extension(gate);
    if let Some(header) = header {
        builder = builder.header(INIT_DATA_HEADER, header);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

#[test]
fn test_verify_init_data_success() {
    let raw = signed_init_data(NOW - 60);

    let user = verify_init_data(&raw, BOT_TOKEN, NOW).expect("valid initData should pass");

    assert_eq!(user.id, 402_695_709);
    assert_eq!(user.first_name, "Ivan");
    assert_eq!(user.username.as_deref(), Some("ivan"));
    assert_eq!(user.is_premium, Some(true));
}

#[test]
fn test_verify_init_data_rejects_any_altered_field() {
    let raw = signed_init_data(NOW - 60);
    let tampered = raw.replace("Ivan", "Ivar");

    assert_eq!(
        verify_init_data(&tampered, BOT_TOKEN, NOW),
        Err(InitDataError::InvalidSignature)
    );
    assert_eq!(
        verify_init_data(&raw, "654321:other-token", NOW),
        Err(InitDataError::InvalidSignature)
    );
}

#[test]
fn test_verify_init_data_stale() {
    let auth_date = NOW - MAX_AUTH_AGE_SECS - 1;
    let raw = signed_init_data(auth_date);

    assert_eq!(
        verify_init_data(&raw, BOT_TOKEN, NOW),
        Err(InitDataError::StaleAuth { auth_date })
    );

    // Exactly 24 hours old is still accepted.
    let raw = signed_init_data(NOW - MAX_AUTH_AGE_SECS);
    assert!(verify_init_data(&raw, BOT_TOKEN, NOW).is_ok());
}

// Signed outside this crate with the published WebApp algorithm.
const KNOWN_BOT_TOKEN: &str = "7342037359:AAHkmO4sR9b2xQvYtT0mZ_example";
const KNOWN_INIT_DATA: &str = "query_id=AAEdKQAYAAAAAB0pABhzWq2b&user=%7B%22id%22%3A402695709%2C%22first_name%22%3A%22Test%22%2C%22last_name%22%3A%22User%22%2C%22username%22%3A%22Legacyyy777%22%2C%22language_code%22%3A%22ru%22%7D&auth_date=1760600000&hash=f77a980d12204cc362d01455ff3c41f94d1492b1639b3fe6a5c81ea3cc00d720";
const KNOWN_HASH: &str = "f77a980d12204cc362d01455ff3c41f94d1492b1639b3fe6a5c81ea3cc00d720";

#[test]
fn test_verify_init_data_known_answer() {
    let user = verify_init_data(KNOWN_INIT_DATA, KNOWN_BOT_TOKEN, 1_760_600_060)
        .expect("externally signed initData should pass");

    assert_eq!(user.id, 402_695_709);
    assert_eq!(user.first_name, "Test");
    assert_eq!(user.username.as_deref(), Some("Legacyyy777"));

    let payload = InitDataPayload::parse(KNOWN_INIT_DATA);
    let pairs: Vec<(&str, &str)> = ["auth_date", "query_id", "user"]
        .into_iter()
        .filter_map(|key| payload.get(key).map(|value| (key, value)))
        .collect();
    assert_eq!(sign_init_data(&pairs, KNOWN_BOT_TOKEN).unwrap(), KNOWN_HASH);
}

#[test]
fn test_verify_init_data_extreme_auth_date_is_stale() {
    let pairs = [("auth_date", "-9223372036854775808"), ("user", USER_JSON)];
    let hash = sign_init_data(&pairs, BOT_TOKEN).unwrap();
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in pairs {
        serializer.append_pair(key, value);
    }
    serializer.append_pair("hash", &hash);

    assert_eq!(
        verify_init_data(&serializer.finish(), BOT_TOKEN, NOW),
        Err(InitDataError::StaleAuth { auth_date: i64::MIN })
    );
}

#[test]
fn test_every_hash_pair_is_left_out_of_the_check_string() {
    let payload = InitDataPayload::parse("hash=first&auth_date=5&hash=second&query_id=q");

    assert_eq!(payload.hash(), Some("first"));
    assert_eq!(payload.data_check_string(), "auth_date=5\nquery_id=q");
}

#[test]
fn test_verify_init_data_missing_pieces() {
    assert_eq!(
        verify_init_data("", BOT_TOKEN, NOW),
        Err(InitDataError::Missing)
    );
    assert_eq!(
        verify_init_data("auth_date=1&user=%7B%7D", BOT_TOKEN, NOW),
        Err(InitDataError::MissingHash)
    );
    assert_eq!(
        verify_init_data("auth_date=1&hash=not-hex", BOT_TOKEN, NOW),
        Err(InitDataError::InvalidSignature)
    );
}

#[test]
fn test_verify_init_data_missing_user() {
    let auth_date = (NOW - 10).to_string();
    let pairs = [("auth_date", auth_date.as_str()), ("query_id", "q")];
    let hash = sign_init_data(&pairs, BOT_TOKEN).unwrap();
    let raw = format!("auth_date={auth_date}&query_id=q&hash={hash}");

    assert_eq!(
        verify_init_data(&raw, BOT_TOKEN, NOW),
        Err(InitDataError::MissingUser)
    );
}

#[test]
fn test_missing_auth_date_counts_as_epoch() {
    let pairs = [("user", USER_JSON)];
    let hash = sign_init_data(&pairs, BOT_TOKEN).unwrap();
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    serializer.append_pair("user", USER_JSON);
    serializer.append_pair("hash", &hash);

    assert_eq!(
        verify_init_data(&serializer.finish(), BOT_TOKEN, NOW),
        Err(InitDataError::StaleAuth { auth_date: 0 })
    );
}

#[test]
fn test_data_check_string_is_sorted_by_key() {
    let payload = InitDataPayload::parse("user=%7B%7D&auth_date=5&hash=abc&query_id=q");

    assert_eq!(payload.hash(), Some("abc"));
    assert_eq!(payload.data_check_string(), "auth_date=5\nquery_id=q\nuser={}");
    assert_eq!(payload.auth_date(), 5);
}

#[test]
fn test_gate_bypass_injects_test_identity() {
    let gate = AuthGate::new(BOT_TOKEN, AuthMode::InsecureDevBypass);

    let user = gate.authenticate(None, NOW).unwrap();

    assert_eq!(user, TelegramUser::dev_bypass_identity());
    assert_eq!(user.id, 402_695_709);
}

#[test]
fn test_gate_requires_init_data_in_telegram_mode() {
    let gate = AuthGate::new(BOT_TOKEN, AuthMode::Telegram);

    assert_eq!(gate.authenticate(None, NOW), Err(InitDataError::Missing));
}

#[tokio::test]
async fn test_extractor_reads_init_data_from_body() {
    let now = Utc::now().timestamp();
    let body = serde_json::json!({ "initData": signed_init_data(now) }).to_string();

    let TelegramAuth(user, _) =
        TelegramAuth::<NoPayload>::from_request(request(telegram_gate(), None, &body), &())
            .await
            .unwrap();

    assert_eq!(user.id, 402_695_709);
}

#[tokio::test]
async fn test_extractor_falls_back_to_header() {
    let now = Utc::now().timestamp();
    let header = signed_init_data(now);

    let TelegramAuth(user, _) =
        TelegramAuth::<NoPayload>::from_request(request(telegram_gate(), Some(&header), ""), &())
            .await
            .unwrap();

    assert_eq!(user.first_name, "Ivan");
}

#[tokio::test]
async fn test_extractor_rejects_missing_and_forged_data() {
    let result =
        TelegramAuth::<NoPayload>::from_request(request(telegram_gate(), None, "{}"), &()).await;
    assert!(matches!(result, Err(AppError::MissingAuth)));

    let body = serde_json::json!({ "initData": "user=%7B%7D&auth_date=1&hash=00" }).to_string();
    let result =
        TelegramAuth::<NoPayload>::from_request(request(telegram_gate(), None, &body), &()).await;
    assert!(matches!(result, Err(AppError::InvalidAuth(_))));
}

#[tokio::test]
async fn test_extractor_rejects_malformed_json() {
    let result =
        TelegramAuth::<NoPayload>::from_request(request(telegram_gate(), None, "{oops"), &()).await;

    assert!(matches!(result, Err(AppError::BadRequest(_))));
}

#[tokio::test]
async fn test_extractor_passes_remaining_fields_through() {
    #[derive(Debug, Deserialize)]
    struct Paging {
        limit: i64,
    }

    let gate = Arc::new(AuthGate::new(BOT_TOKEN, AuthMode::InsecureDevBypass));
    let TelegramAuth(user, paging) =
        TelegramAuth::<Paging>::from_request(request(gate, None, r#"{"limit":20}"#), &())
            .await
            .unwrap();

    assert_eq!(user.username.as_deref(), Some("Legacyyy777"));
    assert_eq!(paging.limit, 20);
}

fn signed_login_payload(auth_date: i64) -> serde_json::Map<String, Value> {
    let mut payload = serde_json::Map::new();
    payload.insert("id".to_string(), Value::from(402_695_709_i64));
    payload.insert("first_name".to_string(), Value::from("Ivan"));
    payload.insert("username".to_string(), Value::from("ivan"));
    payload.insert("auth_date".to_string(), Value::from(auth_date));

    let mut mac = Hmac::<Sha256>::new_from_slice(&Sha256::digest(BOT_TOKEN.as_bytes())).unwrap();
    mac.update(check_string(&payload).as_bytes());
    let hash = hex::encode(mac.finalize().into_bytes());

    payload.insert("hash".to_string(), Value::from(hash));
    payload
}

#[test]
fn test_login_widget_success() {
    let payload = signed_login_payload(NOW - 30);

    let user = verify_login_widget(&payload, BOT_TOKEN, NOW).unwrap();

    assert_eq!(user.id, 402_695_709);
    assert_eq!(user.first_name.as_deref(), Some("Ivan"));
    assert_eq!(user.photo_url, None);
}

#[test]
fn test_login_widget_check_string_excludes_hash() {
    let payload = signed_login_payload(NOW);

    assert_eq!(
        check_string(&payload),
        format!("auth_date={NOW}\nfirst_name=Ivan\nid=402695709\nusername=ivan")
    );
}

#[test]
fn test_login_widget_failures() {
    let mut payload = signed_login_payload(NOW - 30);
    payload.insert("username".to_string(), Value::from("mallory"));
    assert_eq!(
        verify_login_widget(&payload, BOT_TOKEN, NOW),
        Err(LoginWidgetError::InvalidSignature)
    );

    let payload = signed_login_payload(NOW - MAX_AUTH_AGE_SECS - 10);
    assert!(matches!(
        verify_login_widget(&payload, BOT_TOKEN, NOW),
        Err(LoginWidgetError::StaleAuth { .. })
    ));

    let mut payload = signed_login_payload(NOW);
    payload.remove("hash");
    assert_eq!(
        verify_login_widget(&payload, BOT_TOKEN, NOW),
        Err(LoginWidgetError::MissingField("hash"))
    );
}

#[test]
fn test_login_widget_extreme_auth_date_is_stale() {
    let payload = signed_login_payload(i64::MIN);

    assert_eq!(
        verify_login_widget(&payload, BOT_TOKEN, NOW),
        Err(LoginWidgetError::StaleAuth { auth_date: i64::MIN })
    );
}

#[test]
fn test_session_token_round_trip() {
    let user = verify_login_widget(&signed_login_payload(NOW), BOT_TOKEN, NOW).unwrap();
    let now = Utc::now().timestamp();

    let token = issue_session_token(&user, "jwt-secret", now).unwrap();
    let claims = validate_session_token(&token, "jwt-secret").expect("fresh token should pass");

    assert_eq!(claims.user(), user);
    assert_eq!(claims.exp - claims.iat, SESSION_TTL_SECS);
}

#[test]
fn test_session_token_rejects_wrong_secret_and_expiry() {
    let user = verify_login_widget(&signed_login_payload(NOW), BOT_TOKEN, NOW).unwrap();

    let token = issue_session_token(&user, "jwt-secret", Utc::now().timestamp()).unwrap();
    assert!(validate_session_token(&token, "other-secret").is_err());

    let expired = issue_session_token(&user, "jwt-secret", 1_000).unwrap();
    assert!(validate_session_token(&expired, "jwt-secret").is_err());
}

#[test]
fn test_bearer_token_parsing() {
    assert_eq!(bearer_token("Bearer abc.def"), Some("abc.def"));
    assert_eq!(bearer_token("Basic abc"), None);
    assert_eq!(bearer_token("Bearer "), None);
}
