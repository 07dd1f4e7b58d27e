//! The spec's Options table (§6), realised as an `Options`/`RawOptions` pair
//! the way `acorn`'s `options.js` `getOptions()` does: callers build a sparse
//! [`RawOptions`], and [`RawOptions::resolve`] fills in defaults and performs
//! the ecmaVersion year-to-edition conversion.

/// `sourceType` (§6): modules are strict by default and allow `import`/`export`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceType {
    Script,
    Module,
}

/// `allowReserved` is a tri-state: relaxed, strict, or strict-even-for-property-names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllowReserved {
    Yes,
    No,
    /// "never": extends reserved-word checks to property names too.
    Never,
}

/// How the caller spelled `ecmaVersion`: a bare edition (3..14), a year
/// (>=2015), or `"latest"`. [`RawOptions::resolve`] normalises all three to
/// an edition number by subtracting 2009 from year-form input, per §6.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EcmaVersion {
    Edition(u32),
    Year(u32),
    Latest,
}

/// Highest edition this parser understands; `"latest"` resolves to this.
pub const LATEST_EDITION: u32 = 13; // ecmaVersion 2022

/// Default edition used when `ecmaVersion` is omitted entirely (§6: "Required;
/// absent ⇒ warn + default 2020").
pub const DEFAULT_EDITION: u32 = 11; // ecmaVersion 2020

/// Sparse, builder-style input mirroring the full §6 options table. Every
/// field defaults to "unset"; [`RawOptions::resolve`] turns this into a
/// fully-populated [`Options`].
#[derive(Debug, Clone, Default)]
pub struct RawOptions {
    pub ecma_version: Option<EcmaVersion>,
    pub source_type: Option<SourceType>,
    pub allow_reserved: Option<AllowReserved>,
    pub allow_return_outside_function: bool,
    pub allow_import_export_everywhere: bool,
    pub allow_await_outside_function: bool,
    pub allow_super_outside_method: bool,
    pub allow_hash_bang: bool,
    pub locations: bool,
    pub ranges: bool,
    pub preserve_parens: bool,
    pub source_file: Option<String>,
    pub direct_source_file: Option<String>,
}

impl RawOptions {
    pub fn resolve(self) -> Options {
        let source_type = self.source_type.unwrap_or(SourceType::Script);
        let ecma_version = match self.ecma_version {
            None => DEFAULT_EDITION,
            Some(EcmaVersion::Latest) => LATEST_EDITION,
            Some(EcmaVersion::Edition(e)) => e,
            Some(EcmaVersion::Year(y)) if y >= 2015 => y - 2009,
            Some(EcmaVersion::Year(y)) => y,
        };
        Options {
            ecma_version,
            source_type,
            allow_reserved: self.allow_reserved.unwrap_or(if ecma_version >= 5 {
                AllowReserved::No
            } else {
                AllowReserved::Yes
            }),
            allow_return_outside_function: self.allow_return_outside_function,
            allow_import_export_everywhere: self.allow_import_export_everywhere,
            allow_await_outside_function: self.allow_await_outside_function,
            allow_super_outside_method: self.allow_super_outside_method,
            allow_hash_bang: self.allow_hash_bang || ecma_version >= 11,
            locations: self.locations,
            ranges: self.ranges,
            preserve_parens: self.preserve_parens,
            source_file: self.source_file,
            direct_source_file: self.direct_source_file,
        }
    }
}

/// Fully-resolved options, as consulted throughout the tokenizer and parser.
#[derive(Debug, Clone)]
pub struct Options {
    pub ecma_version: u32,
    pub source_type: SourceType,
    pub allow_reserved: AllowReserved,
    pub allow_return_outside_function: bool,
    pub allow_import_export_everywhere: bool,
    pub allow_await_outside_function: bool,
    pub allow_super_outside_method: bool,
    pub allow_hash_bang: bool,
    pub locations: bool,
    pub ranges: bool,
    pub preserve_parens: bool,
    pub source_file: Option<String>,
    pub direct_source_file: Option<String>,
}

impl Default for Options {
    fn default() -> Self {
        RawOptions::default().resolve()
    }
}

impl Options {
    pub fn is_module(&self) -> bool {
        matches!(self.source_type, SourceType::Module)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn year_form_is_offset_by_2009() {
        let opts = RawOptions { ecma_version: Some(EcmaVersion::Year(2022)), ..Default::default() }.resolve();
        assert_eq!(opts.ecma_version, 13);
    }

    #[test]
    fn missing_ecma_version_defaults_to_2020() {
        let opts = RawOptions::default().resolve();
        assert_eq!(opts.ecma_version, DEFAULT_EDITION);
    }

    #[test]
    fn latest_resolves_to_the_newest_known_edition() {
        let opts = RawOptions { ecma_version: Some(EcmaVersion::Latest), ..Default::default() }.resolve();
        assert_eq!(opts.ecma_version, LATEST_EDITION);
    }

    #[test]
    fn module_is_strict_by_default_gate() {
        let opts =
            RawOptions { source_type: Some(SourceType::Module), ..Default::default() }.resolve();
        assert!(opts.is_module());
    }
}
