use super::{DefaultValue, OptionCategory, OptionDef, OptionType};
use DefaultValue::{Bool as B, Int as I, Str as S};

macro_rules! option_table {
    ($($variant:ident => $name:literal, $category:ident, $kind:ident, $default:expr;)*) => {
        /// Registry slot identifiers. `Unknown` (0) never names a real option.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(u16)]
        pub enum OptionId {
            Unknown = 0,
            $($variant,)*
        }

        impl OptionId {
            pub const ALL: &'static [OptionId] = &[$(OptionId::$variant,)*];
        }

        pub(crate) static OPTION_DEFS: &[OptionDef] = &[
            $(OptionDef {
                id: OptionId::$variant,
                name: $name,
                category: OptionCategory::$category,
                kind: OptionType::$kind,
                default: $default,
            },)*
        ];
    };
}

option_table! {
    // Pretty print.
    Indent => "indent", PrettyPrint, AutoBool, I(0);
    IndentSpaces => "indent-spaces", PrettyPrint, Integer, I(2);
    IndentAttributes => "indent-attributes", PrettyPrint, Bool, B(false);
    Wrap => "wrap", PrettyPrint, Integer, I(68);
    WrapAttributes => "wrap-attributes", PrettyPrint, Bool, B(false);
    WrapScriptLiterals => "wrap-script-literals", PrettyPrint, Bool, B(false);
    WrapSections => "wrap-sections", PrettyPrint, Bool, B(true);
    WrapAsp => "wrap-asp", PrettyPrint, Bool, B(true);
    WrapJste => "wrap-jste", PrettyPrint, Bool, B(true);
    WrapPhp => "wrap-php", PrettyPrint, Bool, B(true);
    TabSize => "tab-size", PrettyPrint, Integer, I(8);
    BreakBeforeBr => "break-before-br", PrettyPrint, Bool, B(false);
    VerticalSpace => "vertical-space", PrettyPrint, AutoBool, I(0);
    UppercaseTags => "uppercase-tags", PrettyPrint, Bool, B(false);
    UppercaseAttributes => "uppercase-attributes", PrettyPrint, Bool, B(false);
    HideEndtags => "hide-endtags", PrettyPrint, Bool, B(false);

    // Markup.
    Markup => "markup", Markup, Bool, B(true);
    OutputXml => "output-xml", Markup, Bool, B(false);
    OutputXhtml => "output-xhtml", Markup, Bool, B(false);
    OutputHtml => "output-html", Markup, Bool, B(false);
    InputXml => "input-xml", Markup, Bool, B(false);
    AddXmlDecl => "add-xml-decl", Markup, Bool, B(false);
    AddXmlSpace => "add-xml-space", Markup, Bool, B(false);
    Doctype => "doctype", Markup, Doctype, S("auto");
    NewInlineTags => "new-inline-tags", Markup, TagList, S("");
    NewBlocklevelTags => "new-blocklevel-tags", Markup, TagList, S("");
    NewEmptyTags => "new-empty-tags", Markup, TagList, S("");
    NewPreTags => "new-pre-tags", Markup, TagList, S("");
    CoerceEndtags => "coerce-endtags", Markup, Bool, B(true);
    FixBadComments => "fix-bad-comments", Markup, Bool, B(true);
    FixUri => "fix-uri", Markup, Bool, B(true);
    FixBackslash => "fix-backslash", Markup, Bool, B(true);
    LowerLiterals => "lower-literals", Markup, Bool, B(true);
    RepeatedAttributes => "repeated-attributes", Markup, Repeated, I(1);
    JoinClasses => "join-classes", Markup, Bool, B(true);
    JoinStyles => "join-styles", Markup, Bool, B(true);
    LiteralAttributes => "literal-attributes", Markup, Bool, B(false);
    AltText => "alt-text", Markup, String, S("");
    EncloseText => "enclose-text", Markup, Bool, B(false);
    EncloseBlockText => "enclose-block-text", Markup, Bool, B(false);
    EscapeCdata => "escape-cdata", Markup, Bool, B(false);
    ShowBodyOnly => "show-body-only", Markup, AutoBool, I(0);
    TidyMark => "tidy-mark", Markup, Bool, B(true);
    CssPrefix => "css-prefix", Markup, String, S("c");

    // Cleanup.
    Clean => "clean", Cleanup, Bool, B(false);
    Bare => "bare", Cleanup, Bool, B(false);
    LogicalEmphasis => "logical-emphasis", Cleanup, Bool, B(false);
    DropFontTags => "drop-font-tags", Cleanup, Bool, B(false);
    DropProprietaryAttributes => "drop-proprietary-attributes", Cleanup, Bool, B(false);
    DropEmptyElements => "drop-empty-elements", Cleanup, Bool, B(true);
    DropEmptyParas => "drop-empty-paras", Cleanup, Bool, B(true);
    MergeDivs => "merge-divs", Cleanup, AutoBool, I(2);
    MergeSpans => "merge-spans", Cleanup, AutoBool, I(2);
    HideComments => "hide-comments", Cleanup, Bool, B(false);
    ReplaceColor => "replace-color", Cleanup, Bool, B(false);

    // Encoding.
    CharEncoding => "char-encoding", Encoding, Encoding, I(4);
    InputEncoding => "input-encoding", Encoding, Encoding, I(4);
    OutputEncoding => "output-encoding", Encoding, Encoding, I(4);
    Newline => "newline", Encoding, Newline, I(0);
    NumericEntities => "numeric-entities", Encoding, Bool, B(false);
    QuoteMarks => "quote-marks", Encoding, Bool, B(false);
    QuoteNbsp => "quote-nbsp", Encoding, Bool, B(true);
    QuoteAmpersand => "quote-ampersand", Encoding, Bool, B(true);
    PreserveEntities => "preserve-entities", Encoding, Bool, B(false);
    AsciiChars => "ascii-chars", Encoding, Bool, B(false);

    // Diagnostics.
    ShowWarnings => "show-warnings", Diagnostics, Bool, B(true);
    ShowInfo => "show-info", Diagnostics, Bool, B(true);
    ShowErrors => "show-errors", Diagnostics, Integer, I(6);
    Mute => "mute", Diagnostics, MuteList, S("");
    Quiet => "quiet", Diagnostics, Bool, B(false);
    GnuEmacs => "gnu-emacs", Diagnostics, Bool, B(false);

    // Accessibility.
    AccessibilityCheck => "accessibility-check", Accessibility, AccessLevel, I(0);

    // Document I/O.
    WriteBack => "write-back", DocumentIo, Bool, B(false);
    ErrorFile => "error-file", DocumentIo, String, S("");
    OutputFile => "output-file", DocumentIo, String, S("");
    ForceOutput => "force-output", DocumentIo, Bool, B(false);
    MaxInputSize => "max-input-size", DocumentIo, Integer, I(67_108_864);
}
