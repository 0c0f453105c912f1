//! Query options for statuses/user_timeline.

/// Options for [`Session::user_timeline`](crate::Session::user_timeline).
///
/// Every field is optional. Fields left as `None` are not sent at all, which
/// is different from sending a zero or `false`.
///
/// # Example
///
/// ```
/// use chirp::UserTimelineOptions;
///
/// let options = UserTimelineOptions {
///     count: Some(5),
///     screen_name: Some("acme".to_string()),
///     ..Default::default()
/// };
/// assert_eq!(options.to_query_string(), "count=5&screen_name=acme");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserTimelineOptions {
    pub count: Option<u32>,
    pub exclude_replies: Option<bool>,
    pub include_rts: Option<bool>,
    pub max_id: Option<u64>,
    pub screen_name: Option<String>,
    pub since_id: Option<u64>,
    pub trim_user: Option<bool>,
    pub user_id: Option<u64>,
}

impl UserTimelineOptions {
    /// Options selecting a user by screen name.
    pub fn for_screen_name(screen_name: impl Into<String>) -> Self {
        Self {
            screen_name: Some(screen_name.into()),
            ..Default::default()
        }
    }

    /// Options selecting a user by numeric id.
    pub fn for_user_id(user_id: u64) -> Self {
        Self {
            user_id: Some(user_id),
            ..Default::default()
        }
    }

    /// Returns one `(name, value)` pair per option that is set.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        push(&mut pairs, "count", self.count);
        push(&mut pairs, "exclude_replies", self.exclude_replies);
        push(&mut pairs, "include_rts", self.include_rts);
        push(&mut pairs, "max_id", self.max_id);
        push(&mut pairs, "screen_name", self.screen_name.as_deref());
        push(&mut pairs, "since_id", self.since_id);
        push(&mut pairs, "trim_user", self.trim_user);
        push(&mut pairs, "user_id", self.user_id);
        pairs
    }

    /// Returns the form-urlencoded query string.
    pub fn to_query_string(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.query_pairs())
            .finish()
    }
}

fn push<T: ToString>(pairs: &mut Vec<(&'static str, String)>, name: &'static str, value: Option<T>) {
    if let Some(value) = value {
        pairs.push((name, value.to_string()));
    }
}
