//! Text style property names editable from a cell or metadata style editor.

keyword_enum! {
    /// A single text style property.
    pub enum TextStylePropertyName ("style property") {
        /// `background-color`
        BackgroundColor => "background-color",
        /// `border-bottom-color`
        BorderBottomColor => "border-bottom-color",
        /// `border-bottom-style`
        BorderBottomStyle => "border-bottom-style",
        /// `border-bottom-width`
        BorderBottomWidth => "border-bottom-width",
        /// `border-left-color`
        BorderLeftColor => "border-left-color",
        /// `border-left-style`
        BorderLeftStyle => "border-left-style",
        /// `border-left-width`
        BorderLeftWidth => "border-left-width",
        /// `border-right-color`
        BorderRightColor => "border-right-color",
        /// `border-right-style`
        BorderRightStyle => "border-right-style",
        /// `border-right-width`
        BorderRightWidth => "border-right-width",
        /// `border-top-color`
        BorderTopColor => "border-top-color",
        /// `border-top-style`
        BorderTopStyle => "border-top-style",
        /// `border-top-width`
        BorderTopWidth => "border-top-width",
        /// `color`
        Color => "color",
        /// `font-family`
        FontFamily => "font-family",
        /// `font-size`
        FontSize => "font-size",
        /// `font-style`
        FontStyle => "font-style",
        /// `font-variant`
        FontVariant => "font-variant",
        /// `font-weight`
        FontWeight => "font-weight",
        /// `height`
        Height => "height",
        /// `hyphens`
        Hyphens => "hyphens",
        /// `line-height`
        LineHeight => "line-height",
        /// `padding-bottom`
        PaddingBottom => "padding-bottom",
        /// `padding-left`
        PaddingLeft => "padding-left",
        /// `padding-right`
        PaddingRight => "padding-right",
        /// `padding-top`
        PaddingTop => "padding-top",
        /// `text-align`
        TextAlign => "text-align",
        /// `text-decoration-line`
        TextDecorationLine => "text-decoration-line",
        /// `text-transform`
        TextTransform => "text-transform",
        /// `vertical-align`
        VerticalAlign => "vertical-align",
        /// `white-space`
        WhiteSpace => "white-space",
        /// `width`
        Width => "width",
        /// `word-wrap`
        WordWrap => "word-wrap",
    }
}
