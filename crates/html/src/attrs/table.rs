use super::{AttrDef, AttrId, AttrType};
use crate::tags::Versions;

macro_rules! attr_table {
    ($($konst:ident => $name:literal, [$($vers:ident)|+], $kind:ident;)*) => {
        #[allow(non_camel_case_types, clippy::upper_case_acronyms, dead_code)]
        #[repr(u16)]
        enum Builtin {
            $($konst,)*
        }

        impl AttrId {
            $(pub const $konst: AttrId = AttrId(Builtin::$konst as u16 + 1);)*
        }

        pub(crate) static BUILTIN_ATTRS: &[AttrDef] = &[
            $(AttrDef {
                id: AttrId::$konst,
                name: $name,
                versions: Versions::empty()$(.union(Versions::$vers))+,
                kind: AttrType::$kind,
            },)*
        ];
    };
}

attr_table! {
    ABBR => "abbr", [HTML40 | HTML5], Text;
    ACCEPT => "accept", [ALL], ContentType;
    ACCEPT_CHARSET => "accept-charset", [HTML40 | HTML5], Charset;
    ACCESSKEY => "accesskey", [HTML40 | HTML5], Text;
    ACTION => "action", [ALL], Url;
    ALIGN => "align", [LEGACY], Align;
    ALINK => "alink", [LOOSE], Color;
    ALT => "alt", [ALL], Text;
    ARCHIVE => "archive", [HTML40 | HTML5], Url;
    ASYNC => "async", [HTML5], Bool;
    AUTOCOMPLETE => "autocomplete", [HTML5 | MICROSOFT], Text;
    AUTOFOCUS => "autofocus", [HTML5], Bool;
    AUTOPLAY => "autoplay", [HTML5], Bool;
    AXIS => "axis", [HTML40], Text;
    BACKGROUND => "background", [LOOSE], Url;
    BGCOLOR => "bgcolor", [LOOSE], Color;
    BORDER => "border", [ALL], Length;
    BORDERCOLOR => "bordercolor", [MICROSOFT], Color;
    CELLPADDING => "cellpadding", [FROM32 | HTML5], Length;
    CELLSPACING => "cellspacing", [FROM32 | HTML5], Length;
    CHAR => "char", [HTML40], Text;
    CHAROFF => "charoff", [HTML40], Length;
    CHARSET => "charset", [HTML40 | HTML5], Charset;
    CHECKED => "checked", [ALL], Bool;
    CITE => "cite", [HTML40 | HTML5], Url;
    CLASS => "class", [HTML40 | HTML5], Class;
    CLASSID => "classid", [HTML40], Url;
    CLEAR => "clear", [LOOSE], Clear;
    CODE => "code", [LOOSE], Text;
    CODEBASE => "codebase", [HTML40], Url;
    CODETYPE => "codetype", [HTML40], ContentType;
    COLOR => "color", [LOOSE], Color;
    COLS => "cols", [ALL], Number;
    COLSPAN => "colspan", [FROM32 | HTML5], Number;
    COMPACT => "compact", [LEGACY], Bool;
    CONTENT => "content", [ALL], Text;
    CONTROLS => "controls", [HTML5], Bool;
    COORDS => "coords", [FROM32 | HTML5], Coords;
    DATA => "data", [HTML40 | HTML5], Url;
    DATETIME => "datetime", [HTML40 | HTML5], Text;
    DECLARE => "declare", [HTML40], Bool;
    DEFER => "defer", [HTML40 | HTML5], Bool;
    DIR => "dir", [HTML40 | HTML5], Dir;
    DISABLED => "disabled", [HTML40 | HTML5], Bool;
    ENCTYPE => "enctype", [ALL], ContentType;
    FACE => "face", [LOOSE], Text;
    FOR => "for", [HTML40 | HTML5], Idref;
    FRAME => "frame", [HTML40], Tframe;
    FRAMEBORDER => "frameborder", [IFRAME], Frameborder;
    HEADERS => "headers", [HTML40 | HTML5], Idref;
    HEIGHT => "height", [ALL], Length;
    HIDDEN => "hidden", [HTML5], Bool;
    HREF => "href", [ALL], Url;
    HREFLANG => "hreflang", [HTML40 | HTML5], Lang;
    HSPACE => "hspace", [LOOSE], Number;
    HTTP_EQUIV => "http-equiv", [ALL], Text;
    ID => "id", [ALL], Id;
    ISMAP => "ismap", [ALL], Bool;
    LABEL => "label", [HTML40 | HTML5], Text;
    LANG => "lang", [ALL], Lang;
    LANGUAGE => "language", [LOOSE], Text;
    LEFTMARGIN => "leftmargin", [MICROSOFT], Number;
    LINK => "link", [LOOSE], Color;
    LONGDESC => "longdesc", [HTML40], Url;
    LOOP => "loop", [HTML5 | MICROSOFT], Bool;
    MARGINHEIGHT => "marginheight", [IFRAME], Number;
    MARGINWIDTH => "marginwidth", [IFRAME], Number;
    MAXLENGTH => "maxlength", [ALL], Number;
    MEDIA => "media", [HTML40 | HTML5], Media;
    METHOD => "method", [ALL], Method;
    MULTIPLE => "multiple", [ALL], Bool;
    MUTED => "muted", [HTML5], Bool;
    NAME => "name", [ALL], Name;
    NOHREF => "nohref", [FROM32], Bool;
    NORESIZE => "noresize", [FRAMESET], Bool;
    NOSHADE => "noshade", [LOOSE], Bool;
    NOWRAP => "nowrap", [LOOSE], Bool;
    OBJECT => "object", [LOOSE], Text;
    ONBLUR => "onblur", [HTML40 | HTML5], Script;
    ONCHANGE => "onchange", [HTML40 | HTML5], Script;
    ONCLICK => "onclick", [HTML40 | HTML5], Script;
    ONDBLCLICK => "ondblclick", [HTML40 | HTML5], Script;
    ONFOCUS => "onfocus", [HTML40 | HTML5], Script;
    ONKEYDOWN => "onkeydown", [HTML40 | HTML5], Script;
    ONKEYPRESS => "onkeypress", [HTML40 | HTML5], Script;
    ONKEYUP => "onkeyup", [HTML40 | HTML5], Script;
    ONLOAD => "onload", [HTML40 | HTML5], Script;
    ONMOUSEDOWN => "onmousedown", [HTML40 | HTML5], Script;
    ONMOUSEMOVE => "onmousemove", [HTML40 | HTML5], Script;
    ONMOUSEOUT => "onmouseout", [HTML40 | HTML5], Script;
    ONMOUSEOVER => "onmouseover", [HTML40 | HTML5], Script;
    ONMOUSEUP => "onmouseup", [HTML40 | HTML5], Script;
    ONRESET => "onreset", [HTML40 | HTML5], Script;
    ONSELECT => "onselect", [HTML40 | HTML5], Script;
    ONSUBMIT => "onsubmit", [HTML40 | HTML5], Script;
    ONUNLOAD => "onunload", [HTML40 | HTML5], Script;
    PLACEHOLDER => "placeholder", [HTML5], Text;
    PROFILE => "profile", [HTML40], Url;
    PROMPT => "prompt", [LOOSE], Text;
    READONLY => "readonly", [HTML40 | HTML5], Bool;
    REL => "rel", [ALL], LinkTypes;
    REQUIRED => "required", [HTML5], Bool;
    REV => "rev", [LEGACY], LinkTypes;
    ROLE => "role", [HTML5], Text;
    ROWS => "rows", [ALL], Number;
    ROWSPAN => "rowspan", [FROM32 | HTML5], Number;
    RULES => "rules", [HTML40], Trules;
    SCHEME => "scheme", [HTML40], Text;
    SCOPE => "scope", [HTML40 | HTML5], Scope;
    SCROLLING => "scrolling", [IFRAME], Scrolling;
    SELECTED => "selected", [ALL], Bool;
    SHAPE => "shape", [FROM32 | HTML5], Shape;
    SIZE => "size", [ALL], Text;
    SPAN => "span", [HTML40 | HTML5], Number;
    SRC => "src", [ALL], Url;
    STANDBY => "standby", [HTML40], Text;
    START => "start", [ALL], Number;
    STYLE => "style", [HTML40 | HTML5], Style;
    SUMMARY => "summary", [HTML40], Text;
    TABINDEX => "tabindex", [HTML40 | HTML5], Number;
    TARGET => "target", [IFRAME | HTML5], Target;
    TEXT => "text", [LOOSE], Color;
    TITLE => "title", [ALL], Text;
    TOPMARGIN => "topmargin", [MICROSOFT], Number;
    TYPE => "type", [ALL], ContentType;
    USEMAP => "usemap", [ALL], Url;
    VALIGN => "valign", [FROM32 | HTML5], Valign;
    VALUE => "value", [ALL], Text;
    VALUETYPE => "valuetype", [HTML40], Text;
    VERSION => "version", [LEGACY], Text;
    VLINK => "vlink", [LOOSE], Color;
    VSPACE => "vspace", [LOOSE], Number;
    WIDTH => "width", [ALL], Length;
    WRAP => "wrap", [NETSCAPE], Text;
    XML_LANG => "xml:lang", [XHTML], Lang;
    XML_SPACE => "xml:space", [XHTML], Text;
    XMLNS => "xmlns", [ALL], Url;
}
