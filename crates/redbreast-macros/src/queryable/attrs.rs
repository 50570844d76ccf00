//! Attribute parsing for the Queryable derive macro.
//!
//! Fields accept `#[query(skip)]` and `#[query(rename = "...")]`; the struct
//! itself accepts `#[query(accessors(method, ...))]`.

use syn::{
    parse::{Parse, ParseStream},
    punctuated::Punctuated,
    spanned::Spanned,
    Attribute, Error, Ident, Lit, Meta, Result, Token,
};

/// Field-level attributes from `#[query(...)]`.
#[derive(Debug, Clone, Default)]
pub struct FieldAttr {
    /// Hide this field from queries.
    pub skip: bool,
    /// Custom field name for queries (default: field name).
    pub rename: Option<String>,
}

impl Parse for FieldAttr {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut attr = FieldAttr::default();

        let content: Punctuated<Meta, Token![,]> = Punctuated::parse_terminated(input)?;

        for meta in content {
            match &meta {
                Meta::Path(p) if p.is_ident("skip") => attr.skip = true,

                Meta::NameValue(nv) if nv.path.is_ident("rename") => {
                    if let syn::Expr::Lit(syn::ExprLit {
                        lit: Lit::Str(s), ..
                    }) = &nv.value
                    {
                        if s.value().is_empty() {
                            return Err(Error::new(s.span(), "rename must not be empty"));
                        }
                        attr.rename = Some(s.value());
                    } else {
                        return Err(Error::new(
                            nv.value.span(),
                            "rename must be a string literal",
                        ));
                    }
                }

                _ => {
                    return Err(Error::new(
                        meta.span(),
                        "unknown query attribute. Expected: skip or rename = \"...\"",
                    ));
                }
            }
        }

        if attr.skip && attr.rename.is_some() {
            return Err(Error::new(
                input.span(),
                "skip and rename cannot be combined",
            ));
        }

        Ok(attr)
    }
}

/// Struct-level attributes from `#[query(...)]`.
#[derive(Debug, Clone, Default)]
pub struct ContainerAttr {
    /// Zero-argument methods exposed as fields, by method name.
    pub accessors: Vec<Ident>,
}

impl Parse for ContainerAttr {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut attr = ContainerAttr::default();

        let content: Punctuated<Meta, Token![,]> = Punctuated::parse_terminated(input)?;

        for meta in content {
            match &meta {
                Meta::List(list) if list.path.is_ident("accessors") => {
                    let names = list
                        .parse_args_with(Punctuated::<Ident, Token![,]>::parse_terminated)?;
                    attr.accessors.extend(names);
                }
                _ => {
                    return Err(Error::new(
                        meta.span(),
                        "unknown query attribute. Expected: accessors(...)",
                    ));
                }
            }
        }

        Ok(attr)
    }
}

/// Extract `#[query(...)]` attributes from a field's attributes.
pub fn parse_field_attrs(attrs: &[Attribute]) -> Result<FieldAttr> {
    for attr in attrs {
        if attr.path().is_ident("query") {
            return attr.parse_args::<FieldAttr>();
        }
    }
    Ok(FieldAttr::default())
}

/// Extract and merge every `#[query(...)]` attribute on the struct.
pub fn parse_container_attrs(attrs: &[Attribute]) -> Result<ContainerAttr> {
    let mut merged = ContainerAttr::default();
    for attr in attrs {
        if attr.path().is_ident("query") {
            let parsed = attr.parse_args::<ContainerAttr>()?;
            merged.accessors.extend(parsed.accessors);
        }
    }
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_field(tokens: &str) -> Result<FieldAttr> {
        syn::parse_str::<FieldAttr>(tokens)
    }

    fn parse_container(tokens: &str) -> Result<ContainerAttr> {
        syn::parse_str::<ContainerAttr>(tokens)
    }

    #[test]
    fn test_field_empty() {
        let attr = parse_field("").unwrap();
        assert!(!attr.skip);
        assert_eq!(attr.rename, None);
    }

    #[test]
    fn test_field_skip() {
        let attr = parse_field("skip").unwrap();
        assert!(attr.skip);
    }

    #[test]
    fn test_field_rename() {
        let attr = parse_field(r#"rename = "owner_name""#).unwrap();
        assert_eq!(attr.rename, Some("owner_name".to_string()));
    }

    #[test]
    fn test_field_rename_requires_string() {
        let err = parse_field("rename = 42").unwrap_err();
        assert!(err.to_string().contains("string literal"));
    }

    #[test]
    fn test_field_rename_not_empty() {
        assert!(parse_field(r#"rename = """#).is_err());
    }

    #[test]
    fn test_field_skip_and_rename_conflict() {
        let err = parse_field(r#"skip, rename = "x""#).unwrap_err();
        assert!(err.to_string().contains("cannot be combined"));
    }

    #[test]
    fn test_field_unknown() {
        let err = parse_field("String").unwrap_err();
        assert!(err.to_string().contains("unknown query attribute"));
    }

    #[test]
    fn test_container_accessors() {
        let attr = parse_container("accessors(shout, age_in_days)").unwrap();
        let names: Vec<String> = attr.accessors.iter().map(|i| i.to_string()).collect();
        assert_eq!(names, vec!["shout", "age_in_days"]);
    }

    #[test]
    fn test_container_unknown() {
        assert!(parse_container("skip").is_err());
    }
}
