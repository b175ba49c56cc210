use super::{ContentModel, ParserKind, TagCheck, TagDef, TagId, Versions};
use std::borrow::Cow;

macro_rules! tag_table {
    ($(
        $konst:ident => $name:literal,
        [$($vers:ident)|+],
        [$($model:ident)|*],
        $parser:ident,
        $check:ident;
    )*) => {
        #[allow(non_camel_case_types, clippy::upper_case_acronyms, dead_code)]
        #[repr(u16)]
        enum Builtin {
            $($konst,)*
        }

        impl TagId {
            $(pub const $konst: TagId = TagId(Builtin::$konst as u16 + 1);)*
        }

        pub(crate) const BUILTIN_LEN: u16 = [$(stringify!($konst)),*].len() as u16;

        pub(crate) static BUILTIN_TAGS: &[TagDef] = &[
            $(TagDef {
                id: TagId::$konst,
                name: Cow::Borrowed($name),
                versions: Versions::empty()$(.union(Versions::$vers))+,
                model: ContentModel::empty()$(.union(ContentModel::$model))*,
                parser: ParserKind::$parser,
                check: TagCheck::$check,
            },)*
        ];
    };
}

tag_table! {
    A => "a", [ALL], [INLINE], Inline, Anchor;
    ABBR => "abbr", [HTML40 | HTML5], [INLINE], Inline, None;
    ACRONYM => "acronym", [HTML40], [INLINE], Inline, None;
    ADDRESS => "address", [ALL], [BLOCK], Inline, None;
    APPLET => "applet", [LOOSE], [OBJECT | IMG | INLINE | PARAM], Block, None;
    AREA => "area", [ALL], [BLOCK | EMPTY], Empty, Area;
    ARTICLE => "article", [HTML5], [BLOCK], Block, None;
    ASIDE => "aside", [HTML5], [BLOCK], Block, None;
    AUDIO => "audio", [HTML5], [BLOCK | INLINE | MIXED], Block, None;
    B => "b", [ALL], [INLINE], Inline, None;
    BASE => "base", [ALL], [HEAD | EMPTY], Empty, None;
    BASEFONT => "basefont", [LOOSE], [INLINE | EMPTY], Empty, None;
    BDO => "bdo", [HTML40 | HTML5], [INLINE], Inline, None;
    BIG => "big", [FROM32], [INLINE], Inline, None;
    BLOCKQUOTE => "blockquote", [ALL], [BLOCK], Block, None;
    BODY => "body", [ALL], [HTML | OPT | OMITST], Body, None;
    BR => "br", [ALL], [INLINE | EMPTY], Empty, None;
    BUTTON => "button", [HTML40 | HTML5], [INLINE], Block, None;
    CANVAS => "canvas", [HTML5], [BLOCK | INLINE | MIXED], Block, None;
    CAPTION => "caption", [FROM32 | HTML5], [TABLE], Inline, Caption;
    CENTER => "center", [LOOSE], [BLOCK], Block, None;
    CITE => "cite", [ALL], [INLINE], Inline, None;
    CODE => "code", [ALL], [INLINE], Inline, None;
    COL => "col", [HTML40 | HTML5], [TABLE | EMPTY], Empty, None;
    COLGROUP => "colgroup", [HTML40 | HTML5], [TABLE | OPT], ColGroup, None;
    DATALIST => "datalist", [HTML5], [INLINE | FIELD], Select, None;
    DD => "dd", [ALL], [DEFLIST | OPT | NO_INDENT], Block, None;
    DEL => "del", [HTML40 | HTML5], [INLINE | BLOCK | MIXED], Inline, None;
    DETAILS => "details", [HTML5], [BLOCK], Block, None;
    DFN => "dfn", [ALL], [INLINE], Inline, None;
    DIR => "dir", [LOOSE], [BLOCK | OBSOLETE], List, None;
    DIV => "div", [FROM32 | HTML5], [BLOCK], Block, None;
    DL => "dl", [ALL], [BLOCK], DefList, None;
    DT => "dt", [ALL], [DEFLIST | OPT | NO_INDENT], Inline, None;
    EM => "em", [ALL], [INLINE], Inline, None;
    FIELDSET => "fieldset", [HTML40 | HTML5], [BLOCK], Block, None;
    FIGCAPTION => "figcaption", [HTML5], [BLOCK], Block, None;
    FIGURE => "figure", [HTML5], [BLOCK], Block, None;
    FONT => "font", [LOOSE], [INLINE], Inline, None;
    FOOTER => "footer", [HTML5], [BLOCK], Block, None;
    FORM => "form", [ALL], [BLOCK], Block, Form;
    FRAME => "frame", [FRAMESET], [FRAMES | EMPTY], Empty, None;
    FRAMESET => "frameset", [FRAMESET], [HTML | FRAMES], Frameset, None;
    H1 => "h1", [ALL], [BLOCK | HEADING], Inline, None;
    H2 => "h2", [ALL], [BLOCK | HEADING], Inline, None;
    H3 => "h3", [ALL], [BLOCK | HEADING], Inline, None;
    H4 => "h4", [ALL], [BLOCK | HEADING], Inline, None;
    H5 => "h5", [ALL], [BLOCK | HEADING], Inline, None;
    H6 => "h6", [ALL], [BLOCK | HEADING], Inline, None;
    HEAD => "head", [ALL], [HTML | OPT | OMITST], Head, None;
    HEADER => "header", [HTML5], [BLOCK], Block, None;
    HR => "hr", [ALL], [BLOCK | EMPTY], Empty, Hr;
    HTML => "html", [ALL], [HTML | OPT | OMITST], Html, Html;
    I => "i", [ALL], [INLINE], Inline, None;
    IFRAME => "iframe", [IFRAME | HTML5], [INLINE], Block, None;
    IMG => "img", [ALL], [INLINE | IMG | EMPTY], Empty, Img;
    INPUT => "input", [ALL], [INLINE | IMG | EMPTY], Empty, None;
    INS => "ins", [HTML40 | HTML5], [INLINE | BLOCK | MIXED], Inline, None;
    ISINDEX => "isindex", [LOOSE], [BLOCK | EMPTY], Empty, None;
    KBD => "kbd", [ALL], [INLINE], Inline, None;
    LABEL => "label", [HTML40 | HTML5], [INLINE], Inline, None;
    LEGEND => "legend", [HTML40 | HTML5], [INLINE], Inline, None;
    LI => "li", [ALL], [LIST | OPT | NO_INDENT], Block, None;
    LINK => "link", [ALL], [HEAD | EMPTY], Empty, Link;
    LISTING => "listing", [LEGACY], [BLOCK | OBSOLETE], Pre, None;
    MAIN => "main", [HTML5], [BLOCK], Block, None;
    MAP => "map", [FROM32 | HTML5], [INLINE], Block, Map;
    MARK => "mark", [HTML5], [INLINE], Inline, None;
    MENU => "menu", [LOOSE | HTML5], [BLOCK | OBSOLETE], List, None;
    META => "meta", [ALL], [HEAD | EMPTY], Empty, Meta;
    METER => "meter", [HTML5], [INLINE], Inline, None;
    NAV => "nav", [HTML5], [BLOCK], Block, None;
    NOFRAMES => "noframes", [IFRAME], [BLOCK | FRAMES], NoFrames, None;
    NOSCRIPT => "noscript", [HTML40 | HTML5], [BLOCK | INLINE | MIXED], Block, None;
    OBJECT => "object", [HTML40 | HTML5], [OBJECT | HEAD | IMG | INLINE | PARAM], Block, None;
    OL => "ol", [ALL], [BLOCK], List, None;
    OPTGROUP => "optgroup", [HTML40 | HTML5], [FIELD | OPT], OptGroup, None;
    OPTION => "option", [ALL], [FIELD | OPT], Text, None;
    OUTPUT => "output", [HTML5], [INLINE], Inline, None;
    P => "p", [ALL], [BLOCK | OPT], Inline, None;
    PARAM => "param", [FROM32 | HTML5], [INLINE | EMPTY], Empty, None;
    PLAINTEXT => "plaintext", [HTML20 | HTML32], [BLOCK | OBSOLETE], Pre, None;
    PRE => "pre", [ALL], [BLOCK], Pre, None;
    PROGRESS => "progress", [HTML5], [INLINE], Inline, None;
    Q => "q", [HTML40 | HTML5], [INLINE], Inline, None;
    S => "s", [LOOSE | HTML5], [INLINE], Inline, None;
    SAMP => "samp", [ALL], [INLINE], Inline, None;
    SCRIPT => "script", [FROM32 | HTML5], [HEAD | MIXED | BLOCK | INLINE], Script, Script;
    SECTION => "section", [HTML5], [BLOCK], Block, None;
    SELECT => "select", [ALL], [INLINE | FIELD], Select, None;
    SMALL => "small", [FROM32 | HTML5], [INLINE], Inline, None;
    SOURCE => "source", [HTML5], [BLOCK | INLINE | EMPTY], Empty, None;
    SPAN => "span", [HTML40 | HTML5], [INLINE], Inline, None;
    STRIKE => "strike", [LOOSE], [INLINE], Inline, None;
    STRONG => "strong", [ALL], [INLINE], Inline, None;
    STYLE => "style", [FROM32 | HTML5], [HEAD], Script, Style;
    SUB => "sub", [FROM32 | HTML5], [INLINE], Inline, None;
    SUMMARY => "summary", [HTML5], [BLOCK], Inline, None;
    SUP => "sup", [FROM32 | HTML5], [INLINE], Inline, None;
    TABLE => "table", [FROM32 | HTML5], [BLOCK], Table, Table;
    TBODY => "tbody", [HTML40 | HTML5], [TABLE | ROWGRP | OPT], RowGroup, None;
    TD => "td", [FROM32 | HTML5], [ROW | OPT | NO_INDENT], Block, None;
    TEXTAREA => "textarea", [ALL], [INLINE | FIELD], Text, None;
    TFOOT => "tfoot", [HTML40 | HTML5], [TABLE | ROWGRP | OPT], RowGroup, None;
    TH => "th", [FROM32 | HTML5], [ROW | OPT | NO_INDENT], Block, None;
    THEAD => "thead", [HTML40 | HTML5], [TABLE | ROWGRP | OPT], RowGroup, None;
    TIME => "time", [HTML5], [INLINE], Inline, None;
    TITLE => "title", [ALL], [HEAD], Title, None;
    TR => "tr", [FROM32 | HTML5], [TABLE | OPT], Row, None;
    TRACK => "track", [HTML5], [BLOCK | INLINE | EMPTY], Empty, None;
    TT => "tt", [LEGACY], [INLINE], Inline, None;
    U => "u", [LOOSE | HTML5], [INLINE], Inline, None;
    UL => "ul", [ALL], [BLOCK], List, None;
    VAR => "var", [ALL], [INLINE], Inline, None;
    VIDEO => "video", [HTML5], [BLOCK | INLINE | MIXED], Block, None;
    WBR => "wbr", [NETSCAPE | MICROSOFT | HTML5], [INLINE | EMPTY], Empty, None;
    XMP => "xmp", [LEGACY], [BLOCK | OBSOLETE], Pre, None;

    // Vendor extensions.
    ALIGN => "align", [NETSCAPE], [BLOCK], Block, None;
    BGSOUND => "bgsound", [MICROSOFT], [HEAD | EMPTY], Empty, None;
    BLINK => "blink", [PROPRIETARY], [INLINE], Inline, None;
    COMMENT => "comment", [MICROSOFT], [INLINE], Inline, None;
    EMBED => "embed", [NETSCAPE | MICROSOFT | HTML5], [INLINE | IMG | EMPTY], Empty, None;
    ILAYER => "ilayer", [NETSCAPE], [INLINE], Inline, None;
    KEYGEN => "keygen", [NETSCAPE], [INLINE | EMPTY], Empty, None;
    LAYER => "layer", [NETSCAPE], [BLOCK], Block, None;
    MARQUEE => "marquee", [MICROSOFT], [INLINE], Inline, None;
    MULTICOL => "multicol", [NETSCAPE], [BLOCK], Block, None;
    NOBR => "nobr", [PROPRIETARY], [INLINE], Inline, None;
    NOEMBED => "noembed", [NETSCAPE], [INLINE], Inline, None;
    NOLAYER => "nolayer", [NETSCAPE], [BLOCK | INLINE | MIXED], Inline, None;
    SERVER => "server", [NETSCAPE], [HEAD | MIXED | BLOCK | INLINE], Script, None;
    SERVLET => "servlet", [MICROSOFT], [OBJECT | IMG | INLINE | PARAM], Block, None;
    SPACER => "spacer", [NETSCAPE], [INLINE | EMPTY], Empty, None;
}
