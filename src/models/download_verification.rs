use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct DownloadVerification {
    pub id: Uuid,
    pub expires_at: DateTime<Utc>,
    pub product_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// A verification joined with the parts of its product needed to serve the file.
#[derive(Debug, Clone, FromRow)]
pub struct DownloadGrant {
    pub expires_at: DateTime<Utc>,
    pub product_name: String,
    pub file_path: String,
}

impl DownloadGrant {
    /// Links stay valid up to, but not including, `expires_at`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn grant(expires_at: DateTime<Utc>) -> DownloadGrant {
        DownloadGrant {
            expires_at,
            product_name: "Course".into(),
            file_path: "http://blobs/products/files/a.zip".into(),
        }
    }

    #[test]
    fn expiry_is_exclusive() {
        let now = Utc::now();
        assert!(grant(now).is_expired_at(now));
        assert!(grant(now - Duration::hours(1)).is_expired_at(now));
        assert!(!grant(now + Duration::seconds(1)).is_expired_at(now));
    }
}
