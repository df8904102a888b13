use serde::{ Deserialize, Serialize };

/// Transaction kinds accepted by the transfer form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TxType {
    #[serde(rename = "PIX")]
    Pix,
    #[serde(rename = "TED")]
    Ted,
    #[serde(rename = "deposit")]
    Deposit,
}

impl TxType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TxType::Pix => "PIX",
            TxType::Ted => "TED",
            TxType::Deposit => "deposit",
        }
    }
}

impl std::fmt::Display for TxType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Public projection of a user, safe to return to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserPublic {
    pub id: i64,
    pub name: String,
    pub email: String,
}

impl From<&User> for UserPublic {
    fn from(u: &User) -> Self {
        UserPublic {
            id: u.id,
            name: u.name.clone(),
            email: u.email.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: i64,
    pub user_id: i64,
    pub agency: String,
    pub number: String,
    pub balance: f64,
}

/// Append-only ledger entry. `balance_after` snapshots the account balance
/// immediately after the transaction was applied.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: i64,
    pub user_id: i64,
    #[serde(rename = "type")]
    pub tx_type: TxType,
    pub beneficiary: String,
    pub document: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pix_key: Option<String>,
    pub amount: f64,
    pub date: String,
    pub balance_after: f64,
}

/// Fields of a transaction supplied by the caller; ids, ownership and the
/// balance snapshot are filled in by the store.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub tx_type: TxType,
    pub beneficiary: String,
    pub document: String,
    pub bank: Option<String>,
    pub agency: Option<String>,
    pub account: Option<String>,
    pub pix_key: Option<String>,
    pub amount: f64,
    pub date: String,
}

/// Partial update for PATCH /accounts/:id.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AccountPatch {
    pub agency: Option<String>,
    pub number: Option<String>,
    pub balance: Option<f64>,
}
