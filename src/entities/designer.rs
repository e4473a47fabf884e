#[derive(serde::Serialize, serde::Deserialize, Default, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Designer {
    pub name: String,
    #[serde(default)]
    pub profile_comment: String,
    #[serde(default)]
    pub profile_email: String,
    #[serde(default)]
    pub profile_dream: String,
}
