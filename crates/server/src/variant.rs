use store::IdScheme;

/// The three service variants. They share all library code and differ only in
/// identifier scheme, routed surface, error-payload key, and seed data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// Integer ids, list/get only.
    Readonly,
    /// Integer ids, full CRUD.
    Sequential,
    /// UUID string ids, full CRUD.
    Uuid,
}

impl Variant {
    pub fn service_name(&self) -> &'static str {
        match self {
            Variant::Readonly => "items-readonly",
            Variant::Sequential => "items",
            Variant::Uuid => "items-uuid",
        }
    }

    pub fn id_scheme(&self) -> IdScheme {
        match self {
            Variant::Readonly | Variant::Sequential => IdScheme::Sequential,
            Variant::Uuid => IdScheme::Uuid,
        }
    }

    /// Whether create/delete routes are registered at all.
    pub fn mutable(&self) -> bool {
        !matches!(self, Variant::Readonly)
    }

    /// JSON key used in not-found and invalid-id payloads. The read-only
    /// variant answers with `message`, the others with `error`.
    pub fn payload_key(&self) -> &'static str {
        match self {
            Variant::Readonly => "message",
            Variant::Sequential | Variant::Uuid => "error",
        }
    }

    pub fn seed_names(&self) -> &'static [&'static str] {
        match self {
            Variant::Readonly => &["Alice", "Bob", "Charlotte"],
            Variant::Sequential | Variant::Uuid => &["Item 1", "Item 2", "Item 3"],
        }
    }
}
