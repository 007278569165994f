use proc_macro2::Span;
use syn::ext::IdentExt;
use syn::spanned::Spanned;
use syn::{Field, Ident, Type};

use super::field_attributes::{FieldAttributes, IgnoreDefault, Marker, MarkerKind, Strategy};
use super::field_type::{self, BinaryShape};

// -----------------------------------------------------------------------------
// Input

/// A named struct field with its parsed `#[record(..)]` markers.
#[derive(Debug)]
pub(crate) struct RawFieldDeclaration {
    pub ident: Ident,
    pub ty: Type,
    pub attrs: FieldAttributes,
}

impl RawFieldDeclaration {
    pub(crate) fn from_field(field: &Field) -> syn::Result<Self> {
        let Some(ident) = field.ident.clone() else {
            return Err(syn::Error::new(field.span(), "expected a named field"));
        };
        Ok(Self {
            ident,
            ty: field.ty.clone(),
            attrs: FieldAttributes::parse_attrs(&field.attrs)?,
        })
    }
}

// -----------------------------------------------------------------------------
// Output

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SystemField {
    CreationDate,
    ModificationDate,
    ChangeTag,
}

impl SystemField {
    fn from_field_name(name: &str) -> Option<Self> {
        match name {
            "creation_date" => Some(Self::CreationDate),
            "modification_date" => Some(Self::ModificationDate),
            "record_change_tag" => Some(Self::ChangeTag),
            _ => None,
        }
    }

    fn accepts(self, ty: &Type) -> bool {
        let Some(inner) = field_type::option_inner(ty) else {
            return false;
        };
        match self {
            Self::CreationDate | Self::ModificationDate => field_type::is_system_time(inner),
            Self::ChangeTag => field_type::is_string(inner),
        }
    }

    fn expected_type(self) -> &'static str {
        match self {
            Self::CreationDate | Self::ModificationDate => "Option<SystemTime>",
            Self::ChangeTag => "Option<String>",
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) enum FieldKind {
    Plain(BinaryShape),
    RecordName,
    Owning,
    OwnedBy { owner_field: String },
    Encoding(Strategy),
    Ignored(IgnoreDefault),
    System(SystemField),
}

/// A field with its kind decided.
#[derive(Debug, Clone)]
pub(crate) struct ClassifiedField {
    pub ident: Ident,
    pub ty: Type,
    pub optional: bool,
    pub kind: FieldKind,
    /// Span of the marker that decided the kind, if any.
    pub marker_span: Option<Span>,
}

impl ClassifiedField {
    /// The field name as stored, without any `r#` prefix.
    pub(crate) fn name(&self) -> String {
        self.ident.unraw().to_string()
    }

    /// The declared type as written.
    pub(crate) fn declared_type(&self) -> String {
        match self.kind {
            FieldKind::RecordName => String::from("String"),
            _ => field_type::type_string(&self.ty),
        }
    }
}

// -----------------------------------------------------------------------------
// Classifier

/// Decides the kind of every field and checks the per-type invariants.
///
/// All diagnostics are collected, so one compile run reports every problem.
pub(crate) fn classify(
    record_type: &str,
    type_ident: &Ident,
    declarations: Vec<RawFieldDeclaration>,
) -> Result<Vec<ClassifiedField>, Vec<syn::Error>> {
    let mut errors = Vec::new();
    let mut fields = Vec::with_capacity(declarations.len());
    let mut saw_name_marker = false;

    for declaration in declarations {
        saw_name_marker |= declaration
            .attrs
            .markers
            .iter()
            .any(|m| matches!(m.kind, MarkerKind::Name));
        match classify_field(record_type, declaration) {
            Ok(field) => fields.push(field),
            Err(mut field_errors) => errors.append(&mut field_errors),
        }
    }

    let names: Vec<&ClassifiedField> = fields
        .iter()
        .filter(|f| matches!(f.kind, FieldKind::RecordName))
        .collect();
    match names.as_slice() {
        [] if !saw_name_marker => errors.push(syn::Error::new(
            type_ident.span(),
            format!(
                "`{type_ident}` has no record name field\n\
                 help: mark one `String` field with `#[record(name)]`"
            ),
        )),
        [] | [_] => {}
        many => {
            for field in many {
                errors.push(syn::Error::new(
                    field.marker_span.unwrap_or_else(|| field.ident.span()),
                    format!(
                        "only one field can be the record name, but `{type_ident}` marks {} fields\n\
                         help: remove the `#[record(name)]` marker from `{}`",
                        many.len(),
                        field.name(),
                    ),
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(fields)
    } else {
        Err(errors)
    }
}

fn classify_field(
    record_type: &str,
    declaration: RawFieldDeclaration,
) -> Result<ClassifiedField, Vec<syn::Error>> {
    let RawFieldDeclaration { ident, ty, attrs } = declaration;
    let mut markers = attrs.markers;
    let name = ident.unraw().to_string();

    if markers.len() > 1 {
        return Err(markers
            .iter()
            .map(|marker| {
                syn::Error::new(
                    marker.span,
                    format!(
                        "conflicting markers on `{name}`: `{}` cannot be combined with another marker; \
                         a field takes at most one of `name`, `reference`, `encoding` and `ignore`",
                        marker.kind.keyword(),
                    ),
                )
            })
            .collect());
    }

    let inner = field_type::option_inner(&ty);
    let optional = inner.is_some();
    let marker = markers.pop();
    let marker_span = marker.as_ref().map(|m| m.span);

    let kind = match marker {
        None => match SystemField::from_field_name(&name) {
            Some(system) if system.accepts(&ty) => FieldKind::System(system),
            Some(system) => {
                return Err(vec![syn::Error::new(
                    ty.span(),
                    format!(
                        "`{name}` holds record metadata and must be `{}`, found `{}`\n\
                         help: change the type, or add a marker to map it as an ordinary field",
                        system.expected_type(),
                        field_type::type_string(&ty),
                    ),
                )]);
            }
            None => FieldKind::Plain(field_type::binary_shape(inner.unwrap_or(&ty))),
        },
        Some(Marker { kind, span }) => match kind {
            MarkerKind::Name => {
                if optional || !field_type::is_string(&ty) {
                    return Err(vec![syn::Error::new(
                        span,
                        format!(
                            "the record name field must be a non-optional `String`, found `{}`",
                            field_type::type_string(&ty),
                        ),
                    )]);
                }
                FieldKind::RecordName
            }
            MarkerKind::Owning => FieldKind::Owning,
            MarkerKind::OwnedBy(owner_field) => FieldKind::OwnedBy {
                owner_field: owner_field.map_or_else(|| format!("{record_type}Owner"), |lit| lit.value()),
            },
            MarkerKind::Encoding(strategy) => FieldKind::Encoding(strategy),
            MarkerKind::Ignore(IgnoreDefault::None) if !optional => {
                return Err(vec![syn::Error::new(
                    span,
                    format!(
                        "ignored field `{name}` needs a value when decoding\n\
                         help: make it optional: `{name}: Option<{}>`\n\
                         help: give it a default: `#[record(ignore, default)]` or `#[record(ignore, default = ...)]`",
                        field_type::type_string(&ty),
                    ),
                )]);
            }
            MarkerKind::Ignore(default) => FieldKind::Ignored(default),
        },
    };

    Ok(ClassifiedField {
        ident,
        ty,
        optional,
        kind,
        marker_span,
    })
}

#[cfg(test)]
mod tests {
    use syn::{Field, Ident, parse_quote};

    use super::{ClassifiedField, FieldKind, RawFieldDeclaration, SystemField, classify};
    use crate::derive_data::{BinaryShape, IgnoreDefault, Strategy};

    fn declarations(fields: Vec<Field>) -> Vec<RawFieldDeclaration> {
        fields
            .iter()
            .map(|f| RawFieldDeclaration::from_field(f).unwrap())
            .collect()
    }

    fn run(fields: Vec<Field>) -> Result<Vec<ClassifiedField>, Vec<String>> {
        let ident: Ident = parse_quote!(User);
        classify("User", &ident, declarations(fields))
            .map_err(|errors| errors.iter().map(ToString::to_string).collect())
    }

    #[test]
    fn user_schema() {
        let fields = run(vec![
            parse_quote!(#[record(name)] id: String),
            parse_quote!(age: i64),
            parse_quote!(nickname: Option<String>),
            parse_quote!(avatar: Option<Vec<u8>>),
        ])
        .unwrap();

        assert!(matches!(fields[0].kind, FieldKind::RecordName));
        assert!(matches!(fields[1].kind, FieldKind::Plain(BinaryShape::None)));
        assert!(fields[2].optional);
        assert!(matches!(fields[3].kind, FieldKind::Plain(BinaryShape::Single)));
        assert_eq!(fields[3].declared_type(), "Option<Vec<u8>>");
    }

    #[test]
    fn missing_record_name() {
        let errors = run(vec![parse_quote!(age: i64)]).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("has no record name field"));
    }

    #[test]
    fn every_duplicate_record_name_is_reported() {
        let errors = run(vec![
            parse_quote!(#[record(name)] a: String),
            parse_quote!(#[record(name)] b: String),
        ])
        .unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors[0].contains("remove the `#[record(name)]` marker from `a`"));
        assert!(errors[1].contains("from `b`"));
    }

    #[test]
    fn record_name_type() {
        let errors = run(vec![parse_quote!(#[record(name)] id: Option<String>)]).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("found `Option<String>`"));
    }

    #[test]
    fn conflicting_markers_report_each_marker() {
        let errors = run(vec![
            parse_quote!(#[record(name)] id: String),
            parse_quote!(#[record(reference, encoding = codable)] post: Post),
        ])
        .unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().all(|e| e.contains("conflicting markers on `post`")));
    }

    #[test]
    fn ignored_needs_default() {
        let errors = run(vec![
            parse_quote!(#[record(name)] id: String),
            parse_quote!(#[record(ignore)] cache: Vec<u8>),
        ])
        .unwrap_err();
        assert_eq!(errors[0].matches("help:").count(), 2);

        let fields = run(vec![
            parse_quote!(#[record(name)] id: String),
            parse_quote!(#[record(ignore)] cache: Option<Vec<u8>>),
            parse_quote!(#[record(ignore, default)] hits: u32),
        ])
        .unwrap();
        assert!(matches!(fields[2].kind, FieldKind::Ignored(IgnoreDefault::Trait)));
    }

    #[test]
    fn owned_by_defaults_to_type_owner() {
        let fields = run(vec![
            parse_quote!(#[record(name)] id: String),
            parse_quote!(#[record(reference(owned_by))] profile: Profile),
            parse_quote!(#[record(reference(owned_by = "writer"))] draft: Option<Draft>),
            parse_quote!(#[record(encoding = raw_value)] tier: Tier),
        ])
        .unwrap();

        match &fields[1].kind {
            FieldKind::OwnedBy { owner_field } => assert_eq!(owner_field, "UserOwner"),
            other => panic!("unexpected {other:?}"),
        }
        match &fields[2].kind {
            FieldKind::OwnedBy { owner_field } => assert_eq!(owner_field, "writer"),
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(fields[3].kind, FieldKind::Encoding(Strategy::RawValue)));
    }

    #[test]
    fn system_fields() {
        let fields = run(vec![
            parse_quote!(#[record(name)] id: String),
            parse_quote!(creation_date: Option<SystemTime>),
            parse_quote!(record_change_tag: Option<String>),
        ])
        .unwrap();
        assert!(matches!(fields[1].kind, FieldKind::System(SystemField::CreationDate)));
        assert!(matches!(fields[2].kind, FieldKind::System(SystemField::ChangeTag)));

        let errors = run(vec![
            parse_quote!(#[record(name)] id: String),
            parse_quote!(modification_date: SystemTime),
        ])
        .unwrap_err();
        assert!(errors[0].contains("must be `Option<SystemTime>`"));

        // A marker maps a reserved name as an ordinary field.
        let fields = run(vec![
            parse_quote!(#[record(name)] id: String),
            parse_quote!(#[record(encoding = codable)] creation_date: String),
        ])
        .unwrap();
        assert!(matches!(fields[1].kind, FieldKind::Encoding(Strategy::Codable)));
    }
}
