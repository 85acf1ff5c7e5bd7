//! Browser identity cookies
//!
//! `buvid3`, `buvid4` and `b_nut` are the device identifiers the site expects
//! on anonymous requests. They are obtained either from the cookies set by the
//! landing page or from two JSON endpoints.

use serde::{Deserialize, Serialize};

/// Cookies set by the landing page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuvidCookies {
    pub buvid3: String,
    pub b_nut: String,
}

/// `buvid3` issued by `x/web-frontend/getbuvid`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Buvid3 {
    /// Upstream names this field `buvid`
    #[serde(rename(deserialize = "buvid"))]
    pub buvid3: String,
}

/// `buvid3`/`buvid4` pair issued by `x/frontend/finger/spi`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuvidPair {
    pub b_3: String,
    pub b_4: String,
}

impl BuvidCookies {
    /// Render as a `Cookie` header fragment
    pub fn to_cookie_string(&self) -> String {
        format!("buvid3={}; b_nut={}", self.buvid3, self.b_nut)
    }
}

impl BuvidPair {
    /// Render as a `Cookie` header fragment
    pub fn to_cookie_string(&self) -> String {
        format!("buvid3={}; buvid4={}", self.b_3, self.b_4)
    }
}
