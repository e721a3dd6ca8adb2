use std::fmt::Display;

/// Logical columns of the bot's `users` table.
///
/// Each field carries an ordered alias list collected from the bot schemas
/// seen in the wild; the first alias present in the live table wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum UserField {
    Id,
    TelegramId,
    Balance,
    SubscriptionActive,
    SubscriptionExpires,
    TrafficLimit,
    TrafficUsed,
    DeviceLimit,
    ReferralCode,
    ReferredBy,
    CreatedAt,
}

impl UserField {
    pub const ALL: [UserField; 11] = [
        UserField::Id,
        UserField::TelegramId,
        UserField::Balance,
        UserField::SubscriptionActive,
        UserField::SubscriptionExpires,
        UserField::TrafficLimit,
        UserField::TrafficUsed,
        UserField::DeviceLimit,
        UserField::ReferralCode,
        UserField::ReferredBy,
        UserField::CreatedAt,
    ];

    /// Logical name, also used as the SQL alias of the selected column.
    pub fn as_str(&self) -> &'static str {
        match self {
            UserField::Id => "id",
            UserField::TelegramId => "telegram_id",
            UserField::Balance => "balance",
            UserField::SubscriptionActive => "subscription_active",
            UserField::SubscriptionExpires => "subscription_expires",
            UserField::TrafficLimit => "traffic_limit",
            UserField::TrafficUsed => "traffic_used",
            UserField::DeviceLimit => "device_limit",
            UserField::ReferralCode => "referral_code",
            UserField::ReferredBy => "referred_by",
            UserField::CreatedAt => "created_at",
        }
    }

    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            UserField::Id => &["id", "user_id", "pk"],
            UserField::TelegramId => &["telegram_id", "tg_id", "user_id", "telegram_user_id"],
            UserField::Balance => &["balance_kopeks", "balance", "balance_rub", "wallet"],
            UserField::SubscriptionActive => &[
                "has_active_subscription",
                "subscription_active",
                "is_active",
                "active",
            ],
            UserField::SubscriptionExpires => &[
                "subscribed_until",
                "subscription_expires_at",
                "expires_at",
                "sub_expires",
            ],
            UserField::TrafficLimit => &[
                "traffic_limit_gb",
                "traffic_limit",
                "data_limit_gb",
                "bandwidth_limit",
            ],
            UserField::TrafficUsed => &[
                "traffic_used_gb",
                "traffic_used",
                "data_used_gb",
                "bandwidth_used",
            ],
            UserField::DeviceLimit => &[
                "device_limit",
                "max_devices",
                "devices_limit",
                "max_connections",
            ],
            UserField::ReferralCode => &["referral_code", "ref_code", "invite_code"],
            UserField::ReferredBy => &["referred_by", "referrer_code", "invited_by"],
            UserField::CreatedAt => &["created_at", "registered_at", "join_date", "signup_date"],
        }
    }

    /// Every user lookup filters on the telegram id; the internal id only
    /// feeds join shapes, which are skipped when it is unresolved.
    pub fn is_required(&self) -> bool {
        matches!(self, UserField::TelegramId)
    }
}

impl Display for UserField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
