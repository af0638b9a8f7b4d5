use crate::ir::{
    CheckConstraint, Column, ColumnPosition, CommentDef, CommentTarget, Extension, ForeignKey,
    Ident, Index, Policy, PrimaryKey, QualifiedName, Sequence, Table, Trigger, TypeDef, View,
};

/// One change operation in a migration plan.
///
/// The renderer maps each operation to one or more dialect statements; the
/// ordering pass arranges operations so every plan prefix leaves a
/// structurally valid schema.
#[derive(Debug, Clone, PartialEq)]
pub enum ChangeOp {
    CreateTable(Table),
    DropTable(QualifiedName),
    RenameTable {
        from: QualifiedName,
        to: QualifiedName,
    },

    AddColumn {
        table: QualifiedName,
        column: Box<Column>,
        position: Option<ColumnPosition>,
    },
    DropColumn {
        table: QualifiedName,
        column: Ident,
    },
    /// Full old and new column; renderers derive the minimal statement set.
    ChangeColumn {
        table: QualifiedName,
        from: Box<Column>,
        to: Box<Column>,
    },
    RenameColumn {
        table: QualifiedName,
        from: Ident,
        to: Ident,
    },

    AddIndex {
        table: QualifiedName,
        index: Index,
    },
    DropIndex {
        table: QualifiedName,
        index: Index,
    },

    AddForeignKey {
        table: QualifiedName,
        fk: ForeignKey,
    },
    DropForeignKey {
        table: QualifiedName,
        name: Ident,
    },

    AddCheck {
        table: QualifiedName,
        check: CheckConstraint,
    },
    DropCheck {
        table: QualifiedName,
        name: Ident,
    },

    AddPrimaryKey {
        table: QualifiedName,
        pk: PrimaryKey,
    },
    DropPrimaryKey {
        table: QualifiedName,
        name: Option<Ident>,
    },

    CreateView(View),
    DropView(QualifiedName),
    /// In-place redefinition where the dialect has `CREATE OR REPLACE VIEW`.
    ReplaceView(View),

    CreateTrigger(Trigger),
    DropTrigger {
        name: QualifiedName,
        table: QualifiedName,
    },

    CreateType(TypeDef),
    DropType(QualifiedName),
    /// Appending enum values; any other type change is drop + create.
    AlterType {
        name: QualifiedName,
        added_values: Vec<String>,
    },

    CreateSequence(Sequence),
    DropSequence(QualifiedName),

    CreateExtension(Extension),
    DropExtension(Ident),

    CreatePolicy(Policy),
    DropPolicy {
        name: Ident,
        table: QualifiedName,
    },

    SetComment(CommentDef),
    DropComment {
        target: CommentTarget,
    },
}

impl ChangeOp {
    /// Short operation tag for diagnostics and logs.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::CreateTable(_) => "CREATE TABLE",
            Self::DropTable(_) => "DROP TABLE",
            Self::RenameTable { .. } => "RENAME TABLE",
            Self::AddColumn { .. } => "ADD COLUMN",
            Self::DropColumn { .. } => "DROP COLUMN",
            Self::ChangeColumn { .. } => "CHANGE COLUMN",
            Self::RenameColumn { .. } => "RENAME COLUMN",
            Self::AddIndex { .. } => "ADD INDEX",
            Self::DropIndex { .. } => "DROP INDEX",
            Self::AddForeignKey { .. } => "ADD FOREIGN KEY",
            Self::DropForeignKey { .. } => "DROP FOREIGN KEY",
            Self::AddCheck { .. } => "ADD CHECK",
            Self::DropCheck { .. } => "DROP CHECK",
            Self::AddPrimaryKey { .. } => "ADD PRIMARY KEY",
            Self::DropPrimaryKey { .. } => "DROP PRIMARY KEY",
            Self::CreateView(_) => "CREATE VIEW",
            Self::DropView(_) => "DROP VIEW",
            Self::ReplaceView(_) => "REPLACE VIEW",
            Self::CreateTrigger(_) => "CREATE TRIGGER",
            Self::DropTrigger { .. } => "DROP TRIGGER",
            Self::CreateType(_) => "CREATE TYPE",
            Self::DropType(_) => "DROP TYPE",
            Self::AlterType { .. } => "ALTER TYPE",
            Self::CreateSequence(_) => "CREATE SEQUENCE",
            Self::DropSequence(_) => "DROP SEQUENCE",
            Self::CreateExtension(_) => "CREATE EXTENSION",
            Self::DropExtension(_) => "DROP EXTENSION",
            Self::CreatePolicy(_) => "CREATE POLICY",
            Self::DropPolicy { .. } => "DROP POLICY",
            Self::SetComment(_) => "COMMENT",
            Self::DropComment { .. } => "DROP COMMENT",
        }
    }

    /// Human-readable target for diagnostics.
    pub fn target(&self) -> String {
        match self {
            Self::CreateTable(table) => table.name.to_string(),
            Self::DropTable(name) => name.to_string(),
            Self::RenameTable { to, .. } => to.to_string(),
            Self::AddColumn { table, column, .. } => format!("{table}.{}", column.name),
            Self::DropColumn { table, column } => format!("{table}.{column}"),
            Self::ChangeColumn { table, to, .. } => format!("{table}.{}", to.name),
            Self::RenameColumn { table, to, .. } => format!("{table}.{to}"),
            Self::AddIndex { table, index } => format!("{} on {table}", index.name),
            Self::DropIndex { table, index } => format!("{} on {table}", index.name),
            Self::AddForeignKey { table, fk } => match &fk.name {
                Some(name) => format!("{name} on {table}"),
                None => format!("foreign key on {table}"),
            },
            Self::DropForeignKey { table, name } => format!("{name} on {table}"),
            Self::AddCheck { table, check } => match &check.name {
                Some(name) => format!("{name} on {table}"),
                None => format!("check on {table}"),
            },
            Self::DropCheck { table, name } => format!("{name} on {table}"),
            Self::AddPrimaryKey { table, .. } | Self::DropPrimaryKey { table, .. } => {
                table.to_string()
            }
            Self::CreateView(view) | Self::ReplaceView(view) => view.name.to_string(),
            Self::DropView(name) => name.to_string(),
            Self::CreateTrigger(trigger) => trigger.name.to_string(),
            Self::DropTrigger { name, .. } => name.to_string(),
            Self::CreateType(type_def) => type_def.name.to_string(),
            Self::DropType(name) | Self::AlterType { name, .. } => name.to_string(),
            Self::CreateSequence(sequence) => sequence.name.to_string(),
            Self::DropSequence(name) => name.to_string(),
            Self::CreateExtension(extension) => extension.name.to_string(),
            Self::DropExtension(name) => name.to_string(),
            Self::CreatePolicy(policy) => format!("{} on {}", policy.name, policy.table),
            Self::DropPolicy { name, table } => format!("{name} on {table}"),
            Self::SetComment(comment) => comment.target.to_string(),
            Self::DropComment { target } => target.to_string(),
        }
    }
}
