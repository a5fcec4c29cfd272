use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

impl User {
    pub fn new(id: i64) -> Self {
        Self {
            id,
            username: None,
            first_name: None,
            last_name: None,
        }
    }

    pub fn id_equals_nullable_id(&self, optional_id: Option<i64>) -> bool {
        if let Some(id) = optional_id {
            if self.id == id {
                return true;
            }
        }

        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nullable_id_comparison() {
        let user = User::new(7);

        assert!(user.id_equals_nullable_id(Some(7)));
        assert!(!user.id_equals_nullable_id(Some(8)));
        assert!(!user.id_equals_nullable_id(None));
    }
}
