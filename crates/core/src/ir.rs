mod expr;
mod ident;
mod object;
mod types;

pub use expr::{Expr, Literal};
pub use ident::{Ident, IdentKey, NameKey, QualifiedName};
pub use object::{
    CheckConstraint, Column, ColumnPosition, CommentDef, CommentTarget, Extension, ForeignKey,
    Generated, Identity, Index, KeyPart, Policy, PrimaryKey, RefAction, SchemaObject, Sequence,
    Table, TableOptions, Trigger, TriggerEvent, TriggerTiming, TypeDef, TypeKind, View,
};
pub use types::{DataType, Length};
