//! Attribute Schemas
//!
//! A data source's schema and the record it reads and writes are declared
//! together with the [`model!`](crate::model) macro. Each field line names the
//! attribute, its Rust type and its role; the attribute kind is derived from
//! the Rust type through [`AttributeType`], so the record layout and the
//! schema cannot drift apart.
//!
//! ```
//! use truenas_provider::model;
//! use truenas_provider::framework::schema::{AttributeKind, Model, Role};
//!
//! model! {
//!     pub struct Example {
//!         name: String => Required,
//!         size: Option<i64> => Computed,
//!     }
//! }
//!
//! let attrs = Example::attributes();
//! assert_eq!(attrs[0].role, Role::Required);
//! assert_eq!(attrs[1].kind, AttributeKind::Int64);
//! ```

use serde::Serialize;

/// Who supplies an attribute's value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Must be supplied in configuration
    Required,
    /// May be supplied in configuration, null otherwise
    Optional,
    /// Produced by Read, never configured
    Computed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeKind {
    String,
    Int64,
    Bool,
    ListNested(Vec<Attribute>),
}

impl AttributeKind {
    /// Whether `value` is an acceptable non-null JSON encoding of this kind
    pub fn accepts(&self, value: &serde_json::Value) -> bool {
        use serde_json::Value;
        match (self, value) {
            (Self::String, Value::String(_)) => true,
            (Self::Int64, Value::Number(n)) => n.is_i64(),
            (Self::Bool, Value::Bool(_)) => true,
            (Self::ListNested(_), Value::Array(_)) => true,
            _ => false,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Int64 => "int64",
            Self::Bool => "bool",
            Self::ListNested(_) => "list of objects",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribute {
    pub name: &'static str,
    pub kind: AttributeKind,
    pub role: Role,
}

impl Attribute {
    pub fn new(name: &'static str, kind: AttributeKind, role: Role) -> Self {
        Self { name, kind, role }
    }
}

/// Attribute contract of one data source
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Schema {
    pub description: &'static str,
    pub attributes: Vec<Attribute>,
}

impl Schema {
    pub fn for_model<M: Model>(description: &'static str) -> Self {
        Self {
            description,
            attributes: M::attributes(),
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    pub fn attributes_with_role(&self, role: Role) -> impl Iterator<Item = &Attribute> {
        self.attributes.iter().filter(move |a| a.role == role)
    }
}

/// Maps a Rust field type to its schema kind
pub trait AttributeType {
    fn kind() -> AttributeKind;
}

impl AttributeType for String {
    fn kind() -> AttributeKind {
        AttributeKind::String
    }
}

impl AttributeType for i64 {
    fn kind() -> AttributeKind {
        AttributeKind::Int64
    }
}

impl AttributeType for bool {
    fn kind() -> AttributeKind {
        AttributeKind::Bool
    }
}

impl<T: AttributeType> AttributeType for Option<T> {
    fn kind() -> AttributeKind {
        T::kind()
    }
}

impl<T: Model> AttributeType for Vec<T> {
    fn kind() -> AttributeKind {
        AttributeKind::ListNested(T::attributes())
    }
}

/// A record whose layout doubles as an attribute table
pub trait Model: serde::Serialize + serde::de::DeserializeOwned {
    fn attributes() -> Vec<Attribute>;
}

/// Declare a record struct and its attribute table in one place
///
/// Fields are emitted as public, serde-enabled struct fields in the order
/// given; roles are `Required`, `Optional` or `Computed`.
#[macro_export]
macro_rules! model {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$fmeta:meta])*
                $field:ident : $ty:ty => $role:ident
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, ::serde::Serialize, ::serde::Deserialize)]
        #[serde(deny_unknown_fields)]
        $vis struct $name {
            $(
                $(#[$fmeta])*
                pub $field: $ty,
            )*
        }

        impl $crate::framework::schema::Model for $name {
            fn attributes() -> Vec<$crate::framework::schema::Attribute> {
                vec![
                    $(
                        $crate::framework::schema::Attribute::new(
                            stringify!($field),
                            <$ty as $crate::framework::schema::AttributeType>::kind(),
                            $crate::framework::schema::Role::$role,
                        ),
                    )*
                ]
            }
        }
    };
}
