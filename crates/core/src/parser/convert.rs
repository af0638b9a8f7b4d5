//! Conversion from the `sqlparser` AST into the schema statement list.
//!
//! Canonicalization happens here: type names lose display widths and
//! spelled-out aliases, defaults become structured expressions, inline
//! column constraints are hoisted to table scope, and unnamed constraints
//! receive the name their dialect would assign.

use std::collections::BTreeMap;

use sqlparser::ast::{
    AlterTableOperation, BinaryLength, CharacterLength, ColumnDef, ColumnOption, CommentObject,
    CreateIndex, CreatePolicyCommand, CreatePolicyType, CreateTable, ExactNumberInfo,
    Expr as SqlExpr, FunctionArg, FunctionArgExpr, FunctionArguments, GeneratedAs,
    GeneratedExpressionMode, Ident as SqlIdent, IdentityPropertyFormatKind, IdentityPropertyKind,
    MySQLColumnPosition, ObjectName, ObjectNamePart, Owner, ReferentialAction, SequenceOptions,
    Statement, TableConstraint, TimezoneInfo, UserDefinedTypeRepresentation, Value,
};
use sqlparser::ast::DataType as SqlDataType;

use super::prepass::Prepared;
use super::{AlterAction, DdlStatement, SqlFragment, first_words};
use crate::annotation::RenameAnnotation;
use crate::error::{ParseError, Result, SourceSpan};
use crate::ir::{
    CheckConstraint, Column, ColumnPosition, CommentDef, CommentTarget, DataType, Expr, Extension,
    ForeignKey, Generated, Ident, Identity, Index, KeyPart, Length, Literal, Policy, PrimaryKey,
    QualifiedName, RefAction, Sequence, Table, TypeDef, TypeKind, View,
};
use crate::{Error, Mode};

pub(super) fn statement(
    mode: Mode,
    statement: &Statement,
    fragment: &SqlFragment,
    prepared: &Prepared,
    annotations: &[RenameAnnotation],
) -> Result<DdlStatement> {
    match statement {
        Statement::CreateTable(create) => {
            create_table(mode, create, fragment, prepared, annotations)
        }
        Statement::CreateIndex(create) => create_index(mode, create, fragment, prepared),
        Statement::CreateView {
            materialized,
            temporary,
            to,
            name,
            columns,
            query,
            ..
        } => {
            if *materialized || *temporary || to.is_some() {
                return Err(unknown_statement(mode, fragment));
            }
            Ok(DdlStatement::CreateView(View {
                name: qualified_name(name, fragment)?,
                columns: columns.iter().map(|c| ident(&c.name)).collect(),
                query: query.to_string(),
                renamed_from: None,
            }))
        }
        Statement::CreateType {
            name,
            representation,
        } => Ok(DdlStatement::CreateType(TypeDef {
            name: qualified_name(name, fragment)?,
            kind: match representation {
                UserDefinedTypeRepresentation::Enum { labels } => {
                    TypeKind::Enum(labels.iter().map(|l| l.value.clone()).collect())
                }
                UserDefinedTypeRepresentation::Composite { attributes } => TypeKind::Composite(
                    attributes
                        .iter()
                        .map(|attr| Ok((ident(&attr.name), data_type(&attr.data_type))))
                        .collect::<Result<Vec<_>>>()?,
                ),
            },
        })),
        Statement::CreateSequence {
            name,
            data_type: seq_type,
            sequence_options,
            owned_by,
            ..
        } => create_sequence(name, seq_type.as_ref(), sequence_options, owned_by.as_ref(), fragment),
        Statement::CreateExtension { name, schema, .. } => {
            Ok(DdlStatement::CreateExtension(Extension {
                name: ident(name),
                schema: schema.as_ref().map(ident),
            }))
        }
        Statement::CreatePolicy {
            name,
            table_name,
            policy_type,
            command,
            to,
            using,
            with_check,
        } => Ok(DdlStatement::CreatePolicy(Policy {
            name: ident(name),
            table: qualified_name(table_name, fragment)?,
            permissive: policy_type.as_ref().map(|t| matches!(t, CreatePolicyType::Permissive)),
            command: command.as_ref().map(|c| {
                match c {
                    CreatePolicyCommand::All => "ALL",
                    CreatePolicyCommand::Select => "SELECT",
                    CreatePolicyCommand::Insert => "INSERT",
                    CreatePolicyCommand::Update => "UPDATE",
                    CreatePolicyCommand::Delete => "DELETE",
                }
                .to_string()
            }),
            roles: to
                .as_ref()
                .map(|owners| owners.iter().map(owner_name).collect())
                .unwrap_or_default(),
            using: using.as_ref().map(expr),
            with_check: with_check.as_ref().map(expr),
        })),
        Statement::Comment {
            object_type,
            object_name,
            comment,
            ..
        } => comment_statement(mode, object_type, object_name, comment.clone(), fragment),
        Statement::AlterTable {
            name, operations, ..
        } => alter_table(mode, name, operations, fragment, prepared),
        _ => Err(unknown_statement(mode, fragment)),
    }
}

fn unknown_statement(mode: Mode, fragment: &SqlFragment) -> Error {
    ParseError::new(
        SourceSpan::line(fragment.line),
        format!(
            "unknown statement for {mode}: `{}`",
            first_words(&fragment.text, 4)
        ),
    )
    .into()
}

fn conversion_error(fragment: &SqlFragment, message: impl Into<String>) -> Error {
    ParseError::new(SourceSpan::line(fragment.line), message).into()
}

// --- CREATE TABLE ------------------------------------------------------

fn create_table(
    mode: Mode,
    create: &CreateTable,
    fragment: &SqlFragment,
    prepared: &Prepared,
    annotations: &[RenameAnnotation],
) -> Result<DdlStatement> {
    let CreateTable {
        name,
        columns,
        constraints,
        engine,
        default_charset,
        collation,
        auto_increment_offset,
        ..
    } = create;

    let table_name = qualified_name(name, fragment)?;
    let mut table = Table::new(table_name);

    table.options.engine = engine.as_ref().map(|e| e.name.clone());
    table.options.charset = default_charset.clone();
    table.options.collation = collation.clone();
    if let Some(offset) = auto_increment_offset {
        table
            .options
            .extra
            .insert("AUTO_INCREMENT".to_string(), offset.to_string());
    }

    if let Some(line) = object_name_line(name) {
        let absolute = absolute_line(fragment, line);
        if let Some(from) = annotation_for(annotations, absolute) {
            table.renamed_from = Some(from);
        }
    }

    for def in columns {
        let line = ident_line(&def.name).map(|l| absolute_line(fragment, l));
        let mut column = column_def(mode, &mut table, def, fragment, line, prepared)?;
        if let Some(line) = line
            && let Some(from) = annotation_for(annotations, line)
        {
            column.renamed_from = Some(from);
        }
        table.columns.push(column);
    }

    for constraint in constraints {
        table_constraint(mode, &mut table, constraint, fragment, prepared)?;
    }

    Ok(DdlStatement::CreateTable(table))
}

/// Converts one column definition, hoisting inline constraints onto `table`.
fn column_def(
    mode: Mode,
    table: &mut Table,
    def: &ColumnDef,
    fragment: &SqlFragment,
    line: Option<usize>,
    prepared: &Prepared,
) -> Result<Column> {
    let mut column = Column::new(def.name.value.clone(), data_type(&def.data_type));
    column.name = ident(&def.name);
    if let Some(line) = line {
        column.not_for_replication = prepared.not_for_replication.contains(&line);
    }

    for option_def in &def.options {
        match &option_def.option {
            ColumnOption::Null => column.nullable = true,
            ColumnOption::NotNull => column.nullable = false,
            ColumnOption::Default(default) => {
                column.default = Some(expr(default));
                column.default_constraint = option_def.name.as_ref().map(ident);
            }
            ColumnOption::Unique { is_primary, .. } => {
                if *is_primary {
                    set_primary_key(
                        table,
                        PrimaryKey {
                            name: option_def.name.as_ref().map(ident),
                            columns: vec![KeyPart {
                                column: ident(&def.name),
                                descending: false,
                            }],
                            clustered: line.and_then(|l| prepared.clustered.get(&l).copied()),
                        },
                        fragment,
                    )?;
                    column.nullable = false;
                } else {
                    let name = option_def
                        .name
                        .as_ref()
                        .map(ident)
                        .unwrap_or_else(|| default_unique_name(mode, table, &[&def.name.value]));
                    table.indexes.push(Index {
                        name,
                        columns: vec![KeyPart {
                            column: ident(&def.name),
                            descending: false,
                        }],
                        unique: true,
                        index_type: None,
                        include: Vec::new(),
                        predicate: None,
                        options: BTreeMap::new(),
                        from_constraint: true,
                    });
                }
            }
            ColumnOption::ForeignKey {
                foreign_table,
                referred_columns,
                on_delete,
                on_update,
                ..
            } => {
                let name = default_fk_name(mode, table, &def.name.value);
                table.foreign_keys.push(ForeignKey {
                    name: Some(name),
                    columns: vec![ident(&def.name)],
                    referenced_table: qualified_name(foreign_table, fragment)?,
                    referenced_columns: referred_columns.iter().map(ident).collect(),
                    on_delete: on_delete.map(ref_action),
                    on_update: on_update.map(ref_action),
                    not_for_replication: false,
                });
            }
            ColumnOption::Check(check) => {
                let name = option_def
                    .name
                    .as_ref()
                    .map(ident)
                    .unwrap_or_else(|| default_check_name(mode, table, Some(&def.name.value)));
                table.checks.push(CheckConstraint {
                    name: Some(name),
                    expr: expr(check),
                    no_inherit: false,
                    not_for_replication: line
                        .is_some_and(|l| prepared.not_for_replication.contains(&l)),
                });
            }
            ColumnOption::DialectSpecific(tokens) => {
                let auto_increment = tokens.iter().any(|token| {
                    token
                        .to_string()
                        .eq_ignore_ascii_case("AUTO_INCREMENT")
                });
                if auto_increment {
                    column.auto_increment = true;
                } else {
                    return Err(conversion_error(
                        fragment,
                        format!(
                            "unsupported option on column `{}`",
                            def.name.value
                        ),
                    ));
                }
            }
            ColumnOption::CharacterSet(_) => {}
            ColumnOption::Collation(name) => {
                column.collation = Some(object_name_text(name));
            }
            ColumnOption::Comment(text) => column.comment = Some(text.clone()),
            ColumnOption::OnUpdate(on_update) => column.on_update = Some(expr(on_update)),
            ColumnOption::Generated {
                generated_as,
                sequence_options,
                generation_expr,
                generation_expr_mode,
                ..
            } => match generation_expr {
                Some(generation) => {
                    column.generated = Some(Generated {
                        expr: expr(generation),
                        stored: matches!(generated_as, GeneratedAs::ExpStored)
                            || matches!(generation_expr_mode, Some(GeneratedExpressionMode::Stored)),
                    });
                }
                None => {
                    column.identity = Some(identity_from_sequence(
                        matches!(generated_as, GeneratedAs::Always),
                        sequence_options.as_deref().unwrap_or(&[]),
                    ));
                }
            },
            ColumnOption::Identity(kind) => {
                let (IdentityPropertyKind::Identity(property)
                | IdentityPropertyKind::Autoincrement(property)) = kind;
                let (seed, increment) = match &property.parameters {
                    Some(
                        IdentityPropertyFormatKind::FunctionCall(params)
                        | IdentityPropertyFormatKind::StartAndIncrement(params),
                    ) => (
                        expr_to_i64(&params.seed).unwrap_or(1),
                        expr_to_i64(&params.increment).unwrap_or(1),
                    ),
                    None => (1, 1),
                };
                column.identity = Some(Identity {
                    seed,
                    increment,
                    always: true,
                });
            }
            other => {
                return Err(conversion_error(
                    fragment,
                    format!(
                        "unsupported option `{other}` on column `{}`",
                        def.name.value
                    ),
                ));
            }
        }
    }

    Ok(column)
}

fn table_constraint(
    mode: Mode,
    table: &mut Table,
    constraint: &TableConstraint,
    fragment: &SqlFragment,
    prepared: &Prepared,
) -> Result<()> {
    match constraint {
        TableConstraint::PrimaryKey {
            name,
            index_name,
            columns,
            ..
        } => {
            let line = name
                .as_ref()
                .or(columns.first())
                .and_then(ident_line)
                .map(|l| absolute_line(fragment, l));
            set_primary_key(
                table,
                PrimaryKey {
                    name: name.as_ref().or(index_name.as_ref()).map(ident),
                    columns: columns.iter().map(key_part).collect(),
                    clustered: line.and_then(|l| prepared.clustered.get(&l).copied()),
                },
                fragment,
            )?;
            for part in columns {
                if let Some(column) = find_column_mut(table, &part.value) {
                    column.nullable = false;
                }
            }
        }
        TableConstraint::Unique {
            name,
            index_name,
            index_type,
            columns,
            ..
        } => {
            let column_names: Vec<&str> = columns.iter().map(|c| c.value.as_str()).collect();
            let index = Index {
                name: name
                    .as_ref()
                    .or(index_name.as_ref())
                    .map(ident)
                    .unwrap_or_else(|| default_unique_name(mode, table, &column_names)),
                columns: columns.iter().map(key_part).collect(),
                unique: true,
                index_type: index_type.as_ref().map(|t| t.to_string().to_lowercase()),
                include: Vec::new(),
                predicate: None,
                options: BTreeMap::new(),
                from_constraint: true,
            };
            table.indexes.push(index);
        }
        TableConstraint::ForeignKey {
            name,
            columns,
            foreign_table,
            referred_columns,
            on_delete,
            on_update,
            ..
        } => {
            let line = name
                .as_ref()
                .or(columns.first())
                .and_then(ident_line)
                .map(|l| absolute_line(fragment, l));
            let first_column = columns
                .first()
                .map(|c| c.value.clone())
                .unwrap_or_default();
            table.foreign_keys.push(ForeignKey {
                name: Some(
                    name.as_ref()
                        .map(ident)
                        .unwrap_or_else(|| default_fk_name(mode, table, &first_column)),
                ),
                columns: columns.iter().map(ident).collect(),
                referenced_table: qualified_name(foreign_table, fragment)?,
                referenced_columns: referred_columns.iter().map(ident).collect(),
                on_delete: on_delete.map(ref_action),
                on_update: on_update.map(ref_action),
                not_for_replication: line
                    .is_some_and(|l| prepared.not_for_replication.contains(&l)),
            });
        }
        TableConstraint::Check { name, expr: check } => {
            let line = name.as_ref().and_then(ident_line).map(|l| absolute_line(fragment, l));
            table.checks.push(CheckConstraint {
                name: Some(
                    name.as_ref()
                        .map(ident)
                        .unwrap_or_else(|| default_check_name(mode, table, None)),
                ),
                expr: expr(check),
                no_inherit: false,
                not_for_replication: line
                    .is_some_and(|l| prepared.not_for_replication.contains(&l)),
            });
        }
        TableConstraint::Index {
            name,
            index_type,
            columns,
            ..
        } => {
            let column_names: Vec<&str> = columns.iter().map(|c| c.value.as_str()).collect();
            table.indexes.push(Index {
                name: name
                    .as_ref()
                    .map(ident)
                    .unwrap_or_else(|| default_index_name(&column_names)),
                columns: columns.iter().map(key_part).collect(),
                unique: false,
                index_type: index_type.as_ref().map(|t| t.to_string().to_lowercase()),
                include: Vec::new(),
                predicate: None,
                options: BTreeMap::new(),
                from_constraint: false,
            });
        }
        TableConstraint::FulltextOrSpatial { .. } => {
            return Err(conversion_error(
                fragment,
                "FULLTEXT and SPATIAL indexes are not supported",
            ));
        }
    }

    Ok(())
}

fn set_primary_key(table: &mut Table, pk: PrimaryKey, fragment: &SqlFragment) -> Result<()> {
    if table.primary_key.is_some() {
        return Err(conversion_error(
            fragment,
            format!("table {} declares multiple primary keys", table.name),
        ));
    }
    table.primary_key = Some(pk);
    Ok(())
}

fn find_column_mut<'a>(table: &'a mut Table, name: &str) -> Option<&'a mut Column> {
    table
        .columns
        .iter_mut()
        .find(|c| c.name.value.eq_ignore_ascii_case(name))
}

// --- CREATE INDEX ------------------------------------------------------

fn create_index(
    mode: Mode,
    create: &CreateIndex,
    fragment: &SqlFragment,
    prepared: &Prepared,
) -> Result<DdlStatement> {
    let CreateIndex {
        name,
        table_name,
        using,
        columns,
        unique,
        include,
        with,
        predicate,
        ..
    } = create;

    let Some(name) = name else {
        return Err(conversion_error(
            fragment,
            "CREATE INDEX requires an index name",
        ));
    };

    let mut key_parts = Vec::with_capacity(columns.len());
    for index_column in columns {
        let part = match &index_column.column.expr {
            SqlExpr::Identifier(column) => KeyPart {
                column: ident(column),
                descending: index_column.column.options.asc == Some(false),
            },
            other => {
                return Err(conversion_error(
                    fragment,
                    format!("only plain column index keys are supported, found `{other}`"),
                ));
            }
        };
        key_parts.push(part);
    }

    let mut options = BTreeMap::new();
    for option in with {
        let text = option.to_string();
        match text.split_once('=') {
            Some((key, value)) => {
                options.insert(
                    key.trim().to_ascii_uppercase(),
                    value.trim().to_string(),
                );
            }
            None => {
                options.insert(text.trim().to_ascii_uppercase(), String::new());
            }
        }
    }

    let index_type = match using {
        Some(using) => Some(using.to_string().to_lowercase()),
        None if mode == Mode::Mssql => prepared
            .clustered
            .values()
            .next()
            .map(|clustered| if *clustered { "clustered" } else { "nonclustered" }.to_string()),
        None => None,
    };

    let index_name = object_last_ident(name, fragment)?;
    Ok(DdlStatement::CreateIndex {
        table: qualified_name(table_name, fragment)?,
        index: Index {
            name: index_name,
            columns: key_parts,
            unique: *unique,
            index_type,
            include: include.iter().map(ident).collect(),
            predicate: predicate.as_ref().map(expr),
            options,
            from_constraint: false,
        },
    })
}

// --- CREATE SEQUENCE ---------------------------------------------------

fn create_sequence(
    name: &ObjectName,
    seq_type: Option<&SqlDataType>,
    options: &[SequenceOptions],
    owned_by: Option<&ObjectName>,
    fragment: &SqlFragment,
) -> Result<DdlStatement> {
    let mut sequence = Sequence {
        name: qualified_name(name, fragment)?,
        data_type: seq_type.map(|t| data_type(t).to_string()),
        increment: None,
        min_value: None,
        max_value: None,
        start: None,
        cache: None,
        cycle: false,
        owned_by: None,
    };

    for option in options {
        match option {
            SequenceOptions::IncrementBy(value, _) => sequence.increment = expr_to_i64(value),
            SequenceOptions::MinValue(value) => {
                sequence.min_value = value.as_ref().and_then(expr_to_i64);
            }
            SequenceOptions::MaxValue(value) => {
                sequence.max_value = value.as_ref().and_then(expr_to_i64);
            }
            SequenceOptions::StartWith(value, _) => sequence.start = expr_to_i64(value),
            SequenceOptions::Cache(value) => sequence.cache = expr_to_i64(value),
            SequenceOptions::Cycle(cycle) => sequence.cycle = *cycle,
        }
    }

    if let Some(owner) = owned_by {
        let parts = object_idents(owner);
        if parts.len() >= 2 {
            let column = parts.last().expect("length checked").clone();
            let table = match parts.len() {
                2 => QualifiedName {
                    schema: None,
                    name: parts[0].clone(),
                },
                _ => QualifiedName {
                    schema: Some(parts[0].clone()),
                    name: parts[1].clone(),
                },
            };
            sequence.owned_by = Some((table, column));
        }
    }

    Ok(DdlStatement::CreateSequence(sequence))
}

// --- COMMENT ON --------------------------------------------------------

fn comment_statement(
    mode: Mode,
    object_type: &CommentObject,
    object_name: &ObjectName,
    comment: Option<String>,
    fragment: &SqlFragment,
) -> Result<DdlStatement> {
    let target = match object_type {
        CommentObject::Table => CommentTarget::Table(qualified_name(object_name, fragment)?),
        CommentObject::Column => {
            let parts = object_idents(object_name);
            if parts.len() < 2 {
                return Err(conversion_error(
                    fragment,
                    "COMMENT ON COLUMN requires `table.column`",
                ));
            }
            let column = parts.last().expect("length checked").clone();
            let table = match parts.len() {
                2 => QualifiedName {
                    schema: None,
                    name: parts[0].clone(),
                },
                3 => QualifiedName {
                    schema: Some(parts[0].clone()),
                    name: parts[1].clone(),
                },
                _ => {
                    return Err(conversion_error(
                        fragment,
                        "COMMENT ON COLUMN target has too many name parts",
                    ));
                }
            };
            CommentTarget::Column(table, column)
        }
        _ => return Err(unknown_statement(mode, fragment)),
    };

    Ok(DdlStatement::Comment(CommentDef {
        target,
        text: comment,
    }))
}

// --- ALTER TABLE -------------------------------------------------------

fn alter_table(
    mode: Mode,
    name: &ObjectName,
    operations: &[AlterTableOperation],
    fragment: &SqlFragment,
    prepared: &Prepared,
) -> Result<DdlStatement> {
    let table_name = qualified_name(name, fragment)?;
    // Constraint conversion shares the CREATE TABLE path; the scratch table
    // carries the target name for derived constraint names.
    let mut scratch = Table::new(table_name.clone());
    let mut actions = Vec::new();

    for operation in operations {
        match operation {
            AlterTableOperation::AddColumn {
                column_def: def,
                column_position,
                ..
            } => {
                let line = ident_line(&def.name).map(|l| absolute_line(fragment, l));
                let column = column_def(mode, &mut scratch, def, fragment, line, prepared)?;
                actions.push(AlterAction::AddColumn {
                    column: Box::new(column),
                    position: column_position.as_ref().map(|p| match p {
                        MySQLColumnPosition::First => ColumnPosition::First,
                        MySQLColumnPosition::After(after) => ColumnPosition::After(ident(after)),
                    }),
                });
            }
            AlterTableOperation::AddConstraint(constraint) => {
                table_constraint(mode, &mut scratch, constraint, fragment, prepared)?;
            }
            other => {
                return Err(conversion_error(
                    fragment,
                    format!("unsupported ALTER TABLE operation in schema definition: {other}"),
                ));
            }
        }
    }

    if let Some(pk) = scratch.primary_key.take() {
        actions.push(AlterAction::AddPrimaryKey(pk));
    }
    for fk in scratch.foreign_keys.drain(..) {
        actions.push(AlterAction::AddForeignKey(fk));
    }
    for check in scratch.checks.drain(..) {
        actions.push(AlterAction::AddCheck(check));
    }
    for index in scratch.indexes.drain(..) {
        actions.push(AlterAction::AddIndex(index));
    }

    Ok(DdlStatement::AlterTable {
        table: table_name,
        actions,
    })
}

// --- shared helpers ----------------------------------------------------

pub(super) fn ident(source: &SqlIdent) -> Ident {
    Ident {
        value: source.value.clone(),
        quoted: source.quote_style.is_some(),
    }
}

fn key_part(source: &SqlIdent) -> KeyPart {
    KeyPart {
        column: ident(source),
        descending: false,
    }
}

fn ref_action(action: ReferentialAction) -> RefAction {
    match action {
        ReferentialAction::Restrict => RefAction::Restrict,
        ReferentialAction::Cascade => RefAction::Cascade,
        ReferentialAction::SetNull => RefAction::SetNull,
        ReferentialAction::NoAction => RefAction::NoAction,
        ReferentialAction::SetDefault => RefAction::SetDefault,
    }
}

fn owner_name(owner: &Owner) -> String {
    match owner {
        Owner::Ident(id) => id.value.clone(),
        Owner::CurrentRole => "CURRENT_ROLE".to_string(),
        Owner::CurrentUser => "CURRENT_USER".to_string(),
        Owner::SessionUser => "SESSION_USER".to_string(),
    }
}

fn object_idents(name: &ObjectName) -> Vec<Ident> {
    name.0
        .iter()
        .map(|part| match part {
            ObjectNamePart::Identifier(id) => ident(id),
        })
        .collect()
}

pub(super) fn qualified_name(name: &ObjectName, fragment: &SqlFragment) -> Result<QualifiedName> {
    let parts = object_idents(name);
    match parts.len() {
        1 => Ok(QualifiedName {
            schema: None,
            name: parts.into_iter().next().expect("length checked"),
        }),
        2 => {
            let mut parts = parts.into_iter();
            Ok(QualifiedName {
                schema: parts.next(),
                name: parts.next().expect("length checked"),
            })
        }
        n => Err(conversion_error(
            fragment,
            format!("expected `name` or `schema.name`, found {n} name parts"),
        )),
    }
}

fn object_last_ident(name: &ObjectName, fragment: &SqlFragment) -> Result<Ident> {
    object_idents(name)
        .pop()
        .ok_or_else(|| conversion_error(fragment, "empty object name"))
}

fn object_name_text(name: &ObjectName) -> String {
    name.0
        .iter()
        .map(|part| match part {
            ObjectNamePart::Identifier(id) => id.value.clone(),
        })
        .collect::<Vec<_>>()
        .join(".")
}

fn object_name_line(name: &ObjectName) -> Option<u64> {
    name.0.first().and_then(|part| match part {
        ObjectNamePart::Identifier(id) => ident_line(id),
    })
}

fn ident_line(id: &SqlIdent) -> Option<u64> {
    let line = id.span.start.line;
    (line > 0).then_some(line)
}

fn absolute_line(fragment: &SqlFragment, span_line: u64) -> usize {
    fragment.line + span_line.saturating_sub(1) as usize
}

fn annotation_for(annotations: &[RenameAnnotation], line: usize) -> Option<Ident> {
    annotations
        .iter()
        .find(|a| a.line == line)
        .map(|a| a.from.clone())
}

// --- expressions -------------------------------------------------------

pub(super) fn expr(source: &SqlExpr) -> Expr {
    match source {
        SqlExpr::Value(value) => literal(&value.value),
        SqlExpr::Identifier(id) => Expr::Column(ident(id)),
        SqlExpr::Nested(inner) => expr(inner),
        SqlExpr::Function(function) => function_expr(function),
        other => Expr::Raw(collapse_spaces(&other.to_string())),
    }
}

fn literal(value: &Value) -> Expr {
    match value {
        Value::Null => Expr::Literal(Literal::Null),
        Value::Boolean(b) => Expr::Literal(Literal::Bool(*b)),
        Value::Number(text, _) => Expr::Literal(Literal::Number(text.clone())),
        Value::SingleQuotedString(text)
        | Value::DoubleQuotedString(text)
        | Value::NationalStringLiteral(text)
        | Value::EscapedStringLiteral(text) => Expr::Literal(Literal::String(text.clone())),
        Value::DollarQuotedString(text) => Expr::Literal(Literal::String(text.value.clone())),
        other => Expr::Raw(other.to_string()),
    }
}

fn function_expr(function: &sqlparser::ast::Function) -> Expr {
    let name = function
        .name
        .0
        .iter()
        .map(|part| match part {
            ObjectNamePart::Identifier(id) => id.value.clone(),
        })
        .collect::<Vec<_>>()
        .join(".");

    let args = match &function.args {
        FunctionArguments::None => Vec::new(),
        FunctionArguments::List(list) => list
            .args
            .iter()
            .map(|arg| match arg {
                FunctionArg::Unnamed(FunctionArgExpr::Expr(e)) => expr(e),
                other => Expr::Raw(other.to_string()),
            })
            .collect(),
        FunctionArguments::Subquery(query) => vec![Expr::Raw(query.to_string())],
    };

    if name.eq_ignore_ascii_case("current_timestamp") {
        let precision = args.first().and_then(|arg| match arg {
            Expr::Literal(Literal::Number(text)) => text.parse().ok(),
            _ => None,
        });
        return Expr::CurrentTimestamp { precision };
    }

    Expr::FunctionCall {
        name: name.to_ascii_lowercase(),
        args,
    }
}

fn expr_to_i64(source: &SqlExpr) -> Option<i64> {
    match source {
        SqlExpr::Value(value) => match &value.value {
            Value::Number(text, _) => text.parse().ok(),
            _ => None,
        },
        SqlExpr::UnaryOp { op, expr: inner }
            if matches!(op, sqlparser::ast::UnaryOperator::Minus) =>
        {
            expr_to_i64(inner).map(|v| -v)
        }
        _ => None,
    }
}

fn collapse_spaces(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn identity_from_sequence(always: bool, options: &[SequenceOptions]) -> Identity {
    let mut identity = Identity {
        seed: 1,
        increment: 1,
        always,
    };
    for option in options {
        match option {
            SequenceOptions::StartWith(value, _) => {
                identity.seed = expr_to_i64(value).unwrap_or(1);
            }
            SequenceOptions::IncrementBy(value, _) => {
                identity.increment = expr_to_i64(value).unwrap_or(1);
            }
            _ => {}
        }
    }
    identity
}

// --- derived constraint names ------------------------------------------

fn default_fk_name(mode: Mode, table: &Table, first_column: &str) -> Ident {
    let table_name = &table.name.name.value;
    match mode {
        Mode::Mysql => Ident::new(format!(
            "{table_name}_ibfk_{}",
            table.foreign_keys.len() + 1
        )),
        Mode::Postgres => Ident::new(format!("{table_name}_{first_column}_fkey")),
        Mode::Mssql => Ident::new(format!("FK_{table_name}_{first_column}")),
    }
}

fn default_check_name(mode: Mode, table: &Table, column: Option<&str>) -> Ident {
    let table_name = &table.name.name.value;
    match (mode, column) {
        (Mode::Mysql, _) => Ident::new(format!("{table_name}_chk_{}", table.checks.len() + 1)),
        (Mode::Postgres, Some(column)) => Ident::new(format!("{table_name}_{column}_check")),
        (Mode::Postgres, None) => {
            Ident::new(format!("{table_name}_check_{}", table.checks.len() + 1))
        }
        (Mode::Mssql, Some(column)) => Ident::new(format!("CK_{table_name}_{column}")),
        (Mode::Mssql, None) => Ident::new(format!("CK_{table_name}_{}", table.checks.len() + 1)),
    }
}

fn default_unique_name(mode: Mode, table: &Table, columns: &[&str]) -> Ident {
    let table_name = &table.name.name.value;
    match mode {
        // MySQL names an anonymous unique key after its first column.
        Mode::Mysql => Ident::new(columns.first().copied().unwrap_or("unique").to_string()),
        Mode::Postgres => Ident::new(format!("{table_name}_{}_key", columns.join("_"))),
        Mode::Mssql => Ident::new(format!(
            "UQ_{table_name}_{}",
            columns.first().copied().unwrap_or("key")
        )),
    }
}

fn default_index_name(columns: &[&str]) -> Ident {
    Ident::new(columns.first().copied().unwrap_or("index").to_string())
}

pub(super) fn data_type(source: &SqlDataType) -> DataType {
    match source {
        SqlDataType::Bool | SqlDataType::Boolean => DataType::Bool,
        SqlDataType::TinyInt(_) => DataType::TinyInt { unsigned: false },
        SqlDataType::TinyIntUnsigned(_) => DataType::TinyInt { unsigned: true },
        SqlDataType::SmallInt(_) | SqlDataType::Int2(_) => DataType::SmallInt { unsigned: false },
        SqlDataType::SmallIntUnsigned(_) | SqlDataType::Int2Unsigned(_) => {
            DataType::SmallInt { unsigned: true }
        }
        SqlDataType::MediumInt(_) => DataType::MediumInt { unsigned: false },
        SqlDataType::MediumIntUnsigned(_) => DataType::MediumInt { unsigned: true },
        SqlDataType::Int(_) | SqlDataType::Integer(_) | SqlDataType::Int4(_) => {
            DataType::Int { unsigned: false }
        }
        SqlDataType::IntUnsigned(_)
        | SqlDataType::IntegerUnsigned(_)
        | SqlDataType::Int4Unsigned(_) => DataType::Int { unsigned: true },
        SqlDataType::BigInt(_) | SqlDataType::Int8(_) => DataType::BigInt { unsigned: false },
        SqlDataType::BigIntUnsigned(_) | SqlDataType::Int8Unsigned(_) => {
            DataType::BigInt { unsigned: true }
        }
        SqlDataType::Numeric(info) | SqlDataType::Decimal(info) | SqlDataType::Dec(info) => {
            let (precision, scale) = match info {
                ExactNumberInfo::None => (None, None),
                ExactNumberInfo::Precision(p) => (Some(*p as u32), None),
                ExactNumberInfo::PrecisionAndScale(p, s) => (Some(*p as u32), Some(*s as u32)),
            };
            DataType::Decimal { precision, scale }
        }
        SqlDataType::Float(_) | SqlDataType::Float4 => DataType::Float,
        SqlDataType::Real => DataType::Real,
        SqlDataType::Double(_) | SqlDataType::DoublePrecision | SqlDataType::Float8 => {
            DataType::Double
        }
        SqlDataType::Character(length) | SqlDataType::Char(length) => DataType::Char {
            length: char_length_fixed(length.as_ref()),
        },
        SqlDataType::CharacterVarying(length)
        | SqlDataType::CharVarying(length)
        | SqlDataType::Varchar(length) => DataType::Varchar {
            length: char_length(length.as_ref()),
        },
        SqlDataType::Nvarchar(length) => DataType::NVarchar {
            length: char_length(length.as_ref()),
        },
        SqlDataType::Text => DataType::Text,
        SqlDataType::Binary(length) => DataType::Binary {
            length: length.map(|l| l as u32),
        },
        SqlDataType::Varbinary(length) => DataType::Varbinary {
            length: length.as_ref().map(|l| match l {
                BinaryLength::IntegerLength { length } => Length::Fixed(*length as u32),
                BinaryLength::Max => Length::Max,
            }),
        },
        SqlDataType::Blob(_) => DataType::Blob,
        SqlDataType::Bytea => DataType::Bytea,
        SqlDataType::Date => DataType::Date,
        SqlDataType::Time(precision, timezone) => DataType::Time {
            precision: precision.map(|p| p as u32),
            with_timezone: matches!(timezone, TimezoneInfo::WithTimeZone | TimezoneInfo::Tz),
        },
        SqlDataType::Datetime(precision) => DataType::DateTime {
            precision: precision.map(|p| p as u32),
        },
        SqlDataType::Timestamp(precision, timezone) => DataType::Timestamp {
            precision: precision.map(|p| p as u32),
            with_timezone: matches!(timezone, TimezoneInfo::WithTimeZone | TimezoneInfo::Tz),
        },
        SqlDataType::JSON => DataType::Json,
        SqlDataType::JSONB => DataType::Jsonb,
        SqlDataType::Uuid => DataType::Uuid,
        SqlDataType::Enum(members, _) => DataType::Enum(
            members
                .iter()
                .map(|member| match member {
                    sqlparser::ast::EnumMember::Name(name) => name.clone(),
                    sqlparser::ast::EnumMember::NamedValue(name, _) => name.clone(),
                })
                .collect(),
        ),
        SqlDataType::Array(element) => match element {
            sqlparser::ast::ArrayElemTypeDef::SquareBracket(inner, _)
            | sqlparser::ast::ArrayElemTypeDef::AngleBracket(inner)
            | sqlparser::ast::ArrayElemTypeDef::Parenthesis(inner) => {
                DataType::Array(Box::new(data_type(inner)))
            }
            sqlparser::ast::ArrayElemTypeDef::None => {
                DataType::Custom("array".to_string())
            }
        },
        SqlDataType::Custom(name, args) => {
            let mut text = object_name_text(name).to_ascii_lowercase();
            if !args.is_empty() {
                text = format!("{text}({})", args.join(","));
            }
            DataType::Custom(text)
        }
        other => DataType::Custom(collapse_spaces(&other.to_string()).to_ascii_lowercase()),
    }
}

fn char_length(length: Option<&CharacterLength>) -> Option<Length> {
    length.map(|l| match l {
        CharacterLength::IntegerLength { length, .. } => Length::Fixed(*length as u32),
        CharacterLength::Max => Length::Max,
    })
}

fn char_length_fixed(length: Option<&CharacterLength>) -> Option<u32> {
    length.and_then(|l| match l {
        CharacterLength::IntegerLength { length, .. } => Some(*length as u32),
        CharacterLength::Max => None,
    })
}
