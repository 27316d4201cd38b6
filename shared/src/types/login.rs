use std::collections::HashMap;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Fragment labels
// ---------------------------------------------------------------------------
//
// The credential `S0.S1.S2` is handed out as four cookies:
//
//   asdw ← S1      ydts ← S0      klia ← S2      yoka ← decoy
//
// and rebuilt server-side as `ydts.asdw.klia`.

/// Label A, carries the claims segment.
pub const LABEL_A: &str = "asdw";
/// Label B, carries the header segment.
pub const LABEL_B: &str = "ydts";
/// Label C, carries the signature segment.
pub const LABEL_C: &str = "klia";
/// Label D, the decoy.
pub const LABEL_DECOY: &str = "yoka";

/// Fixed decoy value. Looks like a credential segment, never derived from one.
pub const DECOY_VALUE: &str = "9qY7e8VoXMAHWIDkTLPSWnTMzNzkxMzgsImV4cCIjcsI";

/// The four labeled values returned by `/login`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FragmentSet {
    #[serde(rename = "asdw")]
    pub a: String,
    #[serde(rename = "ydts")]
    pub b: String,
    #[serde(rename = "klia")]
    pub c: String,
    #[serde(rename = "yoka")]
    pub decoy: String,
}

impl FragmentSet {
    /// `(label, value)` pairs in the order they are emitted as cookies.
    pub fn entries(&self) -> [(&'static str, &str); 4] {
        [
            (LABEL_A, self.a.as_str()),
            (LABEL_B, self.b.as_str()),
            (LABEL_C, self.c.as_str()),
            (LABEL_DECOY, self.decoy.as_str()),
        ]
    }

    /// Label → value map, the shape a parsed cookie header takes.
    pub fn to_map(&self) -> HashMap<String, String> {
        self.entries()
            .iter()
            .map(|(label, value)| (label.to_string(), value.to_string()))
            .collect()
    }

    /// Render as a `Cookie` request header value, as a browser would replay it.
    pub fn to_cookie_header(&self) -> String {
        self.entries()
            .iter()
            .map(|(label, value)| format!("{}={}", label, value))
            .collect::<Vec<_>>()
            .join("; ")
    }
}
