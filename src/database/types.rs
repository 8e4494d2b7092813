use serde::{Deserialize, Serialize};
use sqlx::encode::IsNull;
use sqlx::error::BoxDynError;
use sqlx::sqlite::{SqliteArgumentValue, SqliteTypeInfo, SqliteValueRef};
use sqlx::{Decode, Encode, Sqlite, Type};
use uuid::Uuid;

/// Primary key for users and documents.
///
/// UUIDs are persisted as hyphenated TEXT rather than blobs so rows stay
/// legible in the sqlite shell and in raw query output. Malformed column
/// values fail decode; they never round to a nil id.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, Eq, PartialEq, Hash)]
#[serde(transparent)]
pub struct DbId(Uuid);

impl DbId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl From<Uuid> for DbId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl std::ops::Deref for DbId {
    type Target = Uuid;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::fmt::Display for DbId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl Type<Sqlite> for DbId {
    fn type_info() -> SqliteTypeInfo {
        <&str as Type<Sqlite>>::type_info()
    }

    fn compatible(ty: &SqliteTypeInfo) -> bool {
        <&str as Type<Sqlite>>::compatible(ty)
    }
}

impl Decode<'_, Sqlite> for DbId {
    fn decode(value: SqliteValueRef<'_>) -> Result<Self, BoxDynError> {
        let text = <&str as Decode<Sqlite>>::decode(value)?;
        Ok(Self(Uuid::try_parse(text)?))
    }
}

impl Encode<'_, Sqlite> for DbId {
    fn encode_by_ref(
        &self,
        args: &mut Vec<SqliteArgumentValue<'_>>,
    ) -> Result<IsNull, BoxDynError> {
        <String as Encode<Sqlite>>::encode(self.0.to_string(), args)
    }
}

/// Discriminant for the three document shapes.
///
/// Folders never carry content; files and images always do. Unknown tags
/// are rejected at the boundary so nothing downstream has to re-validate.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Folder,
    File,
    Image,
}

impl DocumentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Folder => "folder",
            DocumentKind::File => "file",
            DocumentKind::Image => "image",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "folder" => Some(DocumentKind::Folder),
            "file" => Some(DocumentKind::File),
            "image" => Some(DocumentKind::Image),
            _ => None,
        }
    }

    /// Whether documents of this kind carry bytes in the content store.
    pub fn has_content(&self) -> bool {
        !matches!(self, DocumentKind::Folder)
    }
}

impl Decode<'_, Sqlite> for DocumentKind {
    fn decode(value: SqliteValueRef<'_>) -> Result<Self, BoxDynError> {
        let s = <String as Decode<Sqlite>>::decode(value)?;
        Self::parse(&s).ok_or_else(|| format!("unrecognized document kind: {s}").into())
    }
}

impl Encode<'_, Sqlite> for DocumentKind {
    fn encode_by_ref(
        &self,
        args: &mut Vec<SqliteArgumentValue<'_>>,
    ) -> Result<IsNull, BoxDynError> {
        args.push(SqliteArgumentValue::Text(self.as_str().into()));
        Ok(IsNull::No)
    }
}

impl Type<Sqlite> for DocumentKind {
    fn compatible(ty: &SqliteTypeInfo) -> bool {
        <String as Type<Sqlite>>::compatible(ty)
    }

    fn type_info() -> SqliteTypeInfo {
        <String as Type<Sqlite>>::type_info()
    }
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_text_form_parses_back() {
        let id = DbId::generate();
        let parsed = Uuid::try_parse(&id.to_string()).unwrap();
        assert_eq!(DbId::from(parsed), id);
    }

    #[test]
    fn kind_round_trips_through_tag() {
        for kind in [DocumentKind::Folder, DocumentKind::File, DocumentKind::Image] {
            assert_eq!(DocumentKind::parse(kind.as_str()), Some(kind));
        }
    }

    #[test]
    fn kind_rejects_unknown_tags() {
        assert_eq!(DocumentKind::parse("symlink"), None);
        assert_eq!(DocumentKind::parse(""), None);
        assert_eq!(DocumentKind::parse("Folder"), None);
    }

    #[test]
    fn only_folders_are_content_free() {
        assert!(!DocumentKind::Folder.has_content());
        assert!(DocumentKind::File.has_content());
        assert!(DocumentKind::Image.has_content());
    }
}
