//! Legacy element classifications driving tag-closure behavior.
//!
//! These sets are deliberately the permissive HTML-3.2-era ones, not the
//! HTML5 categories: the scanner exists to make sense of whatever markup
//! arrives in the wild, and closure decisions (auto-closing inline runs,
//! self-closing list items, void elements) follow the classic serializer
//! rules. Names are matched as exact lowercase ASCII.

/// Void (unary) elements: never pushed on the open-element stack and always
/// re-serialized self-closed.
pub fn is_void(name: &str) -> bool {
    matches!(
        name,
        "area"
            | "base"
            | "basefont"
            | "br"
            | "col"
            | "frame"
            | "hr"
            | "img"
            | "input"
            | "isindex"
            | "link"
            | "meta"
            | "param"
            | "embed"
    )
}

/// Block-level elements. A block start tag first closes any run of inline
/// elements sitting on top of the open-element stack.
pub fn is_block(name: &str) -> bool {
    matches!(
        name,
        "address"
            | "applet"
            | "blockquote"
            | "button"
            | "center"
            | "dd"
            | "del"
            | "dir"
            | "div"
            | "dl"
            | "dt"
            | "fieldset"
            | "form"
            | "frameset"
            | "hr"
            | "iframe"
            | "ins"
            | "isindex"
            | "li"
            | "map"
            | "menu"
            | "noframes"
            | "noscript"
            | "object"
            | "ol"
            | "p"
            | "pre"
            | "script"
            | "table"
            | "tbody"
            | "td"
            | "tfoot"
            | "th"
            | "thead"
            | "tr"
            | "ul"
    )
}

/// Inline elements, the ones a block start tag auto-closes.
pub fn is_inline(name: &str) -> bool {
    matches!(
        name,
        "a" | "abbr"
            | "acronym"
            | "applet"
            | "b"
            | "basefont"
            | "bdo"
            | "big"
            | "br"
            | "button"
            | "cite"
            | "code"
            | "del"
            | "dfn"
            | "em"
            | "font"
            | "i"
            | "iframe"
            | "img"
            | "input"
            | "ins"
            | "kbd"
            | "label"
            | "map"
            | "object"
            | "q"
            | "s"
            | "samp"
            | "script"
            | "select"
            | "small"
            | "span"
            | "strike"
            | "strong"
            | "sub"
            | "sup"
            | "textarea"
            | "tt"
            | "u"
            | "var"
    )
}

/// Elements that close an identical element sitting directly on the stack
/// top, so `<li>a<li>b` nests as siblings rather than a chain.
pub fn closes_self(name: &str) -> bool {
    matches!(
        name,
        "colgroup"
            | "dd"
            | "dt"
            | "li"
            | "options"
            | "p"
            | "td"
            | "tfoot"
            | "th"
            | "thead"
            | "tr"
    )
}

/// Boolean attributes: when written without a value they resolve to their
/// own name (`checked` becomes `checked="checked"`). Lookup is
/// case-sensitive; the scanner passes the source-cased attribute name.
pub fn fills_value(name: &str) -> bool {
    matches!(
        name,
        "checked"
            | "compact"
            | "declare"
            | "defer"
            | "disabled"
            | "ismap"
            | "multiple"
            | "nohref"
            | "noresize"
            | "noshade"
            | "nowrap"
            | "readonly"
            | "selected"
    )
}

/// Raw-text elements: content is scanned as an opaque run up to the matching
/// close tag, never as nested markup.
pub fn is_raw_text(name: &str) -> bool {
    matches!(name, "script" | "style")
}
