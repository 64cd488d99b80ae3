use chrono::Utc;
use uuid::Uuid;

const SESSION_DATE_FORMAT: &str = "%d%m%Y";
const SESSION_UNIQUE_LENGTH: usize = 8;

/// Session ids are `<prefix><DDMMYYYY><8 uppercase hex chars>`. The hex
/// tail comes from a fresh v4 uuid; collision odds are accepted rather
/// than tracked, since the pipeline keeps no registry between requests.
pub fn generate_session_id(prefix: &str) -> String {
    let date_part = Utc::now().format(SESSION_DATE_FORMAT);
    let unique = Uuid::new_v4().simple().to_string();
    let unique_part = unique[..SESSION_UNIQUE_LENGTH].to_uppercase();
    format!("{prefix}{date_part}{unique_part}")
}
