use syn::{Data, DeriveInput, Fields, Ident};

use super::classifier::{ClassifiedField, FieldKind, RawFieldDeclaration, classify};
use super::field_type;
use super::type_attributes::TypeAttributes;

/// A struct accepted by `#[derive(RecordConvertible)]`.
pub(crate) struct RecordStruct<'a> {
    pub ident: &'a Ident,
    pub record_type: String,
    pub attrs: TypeAttributes,
    /// Persisted fields in declaration order; the schema index of a field
    /// is its position here.
    pub fields: Vec<ClassifiedField>,
    /// `PhantomData` fields, filled with `Default::default()` on decode.
    pub skipped: Vec<&'a Ident>,
    pub rk_mapper_path: syn::Path,
}

/// Folds diagnostics into one error carrying all of them.
pub(crate) fn combine(errors: impl IntoIterator<Item = syn::Error>) -> Option<syn::Error> {
    errors.into_iter().reduce(|mut all, e| {
        all.combine(e);
        all
    })
}

impl<'a> RecordStruct<'a> {
    pub(crate) fn from_input(ast: &'a DeriveInput) -> syn::Result<Self> {
        let attrs = TypeAttributes::parse_attrs(&ast.attrs)?;

        if !ast.generics.params.is_empty() {
            return Err(syn::Error::new_spanned(
                &ast.generics,
                "`RecordConvertible` cannot be derived for generic types",
            ));
        }

        let named = match &ast.data {
            Data::Struct(data) => match &data.fields {
                Fields::Named(named) => named,
                Fields::Unnamed(_) | Fields::Unit => {
                    return Err(syn::Error::new(
                        ast.ident.span(),
                        "`RecordConvertible` can only be derived for structs with named fields",
                    ));
                }
            },
            Data::Enum(_) | Data::Union(_) => {
                return Err(syn::Error::new(
                    ast.ident.span(),
                    "`RecordConvertible` can only be derived for structs",
                ));
            }
        };

        let record_type = attrs
            .record_type
            .as_ref()
            .map_or_else(|| ast.ident.to_string(), syn::LitStr::value);

        let mut errors = Vec::new();
        let mut declarations = Vec::new();
        let mut skipped = Vec::new();
        for field in &named.named {
            if field_type::is_phantom(&field.ty) {
                if let Some(ident) = &field.ident {
                    skipped.push(ident);
                }
                continue;
            }
            match RawFieldDeclaration::from_field(field) {
                Ok(declaration) => declarations.push(declaration),
                Err(e) => errors.push(e),
            }
        }

        let fields = match classify(&record_type, &ast.ident, declarations) {
            Ok(fields) => fields,
            Err(classify_errors) => {
                errors.extend(classify_errors);
                Vec::new()
            }
        };
        if let Some(error) = combine(errors) {
            return Err(error);
        }

        Ok(Self {
            ident: &ast.ident,
            record_type,
            attrs,
            fields,
            skipped,
            rk_mapper_path: crate::path::rk_mapper(),
        })
    }

    /// The field holding the record name. Present after classification.
    pub(crate) fn record_name_field(&self) -> Option<(usize, &ClassifiedField)> {
        self.fields
            .iter()
            .enumerate()
            .find(|(_, f)| matches!(f.kind, FieldKind::RecordName))
    }
}
