//! CSS selectors over [`XmlElement`] trees
//!
//! Parsing and matching are done by the `selectors` crate; this module only
//! exposes the element tree to it. Names are XML names: type and attribute
//! selectors compare the qualified name as written (`dc\:title`,
//! `[epub\:type~="toc"]`), case-sensitively.

use std::fmt;
use std::rc::Rc;

use cssparser::{Parser, ParserInput};
use selectors::attr::{AttrSelectorOperation, CaseSensitivity, NamespaceConstraint};
use selectors::context::{MatchingContext, SelectorCaches};
use selectors::matching::ElementSelectorFlags;
use selectors::parser::{ParseRelative, SelectorList, SelectorParseErrorKind};
use selectors::{OpaqueElement, SelectorImpl};

use super::tree::XmlElement;

/// A parsed selector list
#[derive(Clone)]
pub struct Selector {
    source: String,
    selectors: Vec<selectors::parser::Selector<XmlSelectors>>,
}

impl fmt::Debug for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Selector").field(&self.source).finish()
    }
}

impl Selector {
    /// Parse a selector string. Returns `None` if the syntax is not supported.
    pub fn parse(input: &str) -> Option<Self> {
        let mut parser_input = ParserInput::new(input);
        let mut parser = Parser::new(&mut parser_input);
        let list = SelectorList::parse(&XmlSelectors, &mut parser, ParseRelative::No).ok()?;

        Some(Self {
            source: input.trim().to_string(),
            selectors: list.slice().to_vec(),
        })
    }

    /// Selector text as given to [`Selector::parse`]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// All elements matching this selector under `scope`, in document order.
    ///
    /// When `include_scope` is false only proper descendants of `scope` are
    /// candidates, though `scope` can still satisfy ancestor steps.
    pub fn select<'a>(&self, scope: &'a XmlElement, include_scope: bool) -> Vec<&'a XmlElement> {
        let mut caches = SelectorCaches::default();
        let mut context = MatchingContext::new(
            selectors::matching::MatchingMode::Normal,
            None,
            &mut caches,
            selectors::context::QuirksMode::NoQuirks,
            selectors::matching::NeedsSelectorFlags::No,
            selectors::matching::MatchingForInvalidation::No,
        );

        let root = Rc::new(ElementRef::root(scope));
        let mut out = Vec::new();
        if include_scope && self.matches(&root, &mut context) {
            out.push(scope);
        }
        self.visit(&root, &mut context, &mut out);
        out
    }

    fn visit<'a>(
        &self,
        parent: &Rc<ElementRef<'a>>,
        context: &mut MatchingContext<'_, XmlSelectors>,
        out: &mut Vec<&'a XmlElement>,
    ) {
        for (index, element) in parent.element.elements().enumerate() {
            let child = Rc::new(ElementRef {
                element,
                parent: Some(Rc::clone(parent)),
                index,
            });
            if self.matches(&child, context) {
                out.push(element);
            }
            self.visit(&child, context, out);
        }
    }

    fn matches(&self, element: &ElementRef<'_>, context: &mut MatchingContext<'_, XmlSelectors>) -> bool {
        self.selectors.iter().any(|selector| {
            selectors::matching::matches_selector(selector, 0, None, element, context)
        })
    }
}

/// Selector implementation for XML documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct XmlSelectors;

/// String type used for every selector atom.
#[derive(Debug, Clone, PartialEq, Eq, Default, Hash)]
pub(crate) struct CssString(String);

impl precomputed_hash::PrecomputedHash for CssString {
    fn precomputed_hash(&self) -> u32 {
        self.0
            .bytes()
            .fold(0u32, |h, byte| h.wrapping_mul(31).wrapping_add(byte as u32))
    }
}

impl cssparser::ToCss for CssString {
    fn to_css<W: fmt::Write>(&self, dest: &mut W) -> fmt::Result {
        dest.write_str(&self.0)
    }
}

impl AsRef<str> for CssString {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for CssString {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl<'a> From<&'a str> for CssString {
    fn from(s: &'a str) -> Self {
        Self(s.to_string())
    }
}

impl<'i> selectors::parser::Parser<'i> for XmlSelectors {
    type Impl = XmlSelectors;
    type Error = SelectorParseErrorKind<'i>;
}

/// Pseudo-elements never apply to XML documents.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum PseudoElement {}

impl cssparser::ToCss for PseudoElement {
    fn to_css<W: fmt::Write>(&self, _dest: &mut W) -> fmt::Result {
        match *self {}
    }
}

impl selectors::parser::PseudoElement for PseudoElement {
    type Impl = XmlSelectors;

    fn accepts_state_pseudo_classes(&self) -> bool {
        false
    }

    fn valid_after_slotted(&self) -> bool {
        false
    }
}

/// No non-tree-structural pseudo-classes (`:hover`, `:link`) are supported.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum NonTSPseudoClass {}

impl selectors::parser::NonTSPseudoClass for NonTSPseudoClass {
    type Impl = XmlSelectors;

    fn is_active_or_hover(&self) -> bool {
        match *self {}
    }

    fn is_user_action_state(&self) -> bool {
        match *self {}
    }
}

impl cssparser::ToCss for NonTSPseudoClass {
    fn to_css<W: fmt::Write>(&self, _dest: &mut W) -> fmt::Result {
        match *self {}
    }
}

impl SelectorImpl for XmlSelectors {
    type ExtraMatchingData<'a> = ();
    type AttrValue = CssString;
    type Identifier = CssString;
    type LocalName = CssString;
    type NamespaceUrl = CssString;
    type NamespacePrefix = CssString;
    type BorrowedLocalName = CssString;
    type BorrowedNamespaceUrl = CssString;
    type NonTSPseudoClass = NonTSPseudoClass;
    type PseudoElement = PseudoElement;
}

/// An element plus the path back to the selection scope.
///
/// The tree stores no parent links, so each reference carries its parent and
/// its position among the parent's element children.
#[derive(Clone)]
struct ElementRef<'a> {
    element: &'a XmlElement,
    parent: Option<Rc<ElementRef<'a>>>,
    index: usize,
}

impl<'a> ElementRef<'a> {
    fn root(element: &'a XmlElement) -> Self {
        Self {
            element,
            parent: None,
            index: 0,
        }
    }

    fn child_of(parent: &Rc<Self>, index: usize) -> Option<Self> {
        let element = parent.element.elements().nth(index)?;
        Some(Self {
            element,
            parent: Some(Rc::clone(parent)),
            index,
        })
    }

    fn sibling(&self, index: usize) -> Option<Self> {
        Self::child_of(self.parent.as_ref()?, index)
    }
}

impl fmt::Debug for ElementRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementRef")
            .field("name", &self.element.name)
            .field("index", &self.index)
            .finish()
    }
}

impl<'a> selectors::Element for ElementRef<'a> {
    type Impl = XmlSelectors;

    fn opaque(&self) -> OpaqueElement {
        OpaqueElement::new(self.element)
    }

    fn parent_element(&self) -> Option<Self> {
        self.parent.as_deref().cloned()
    }

    fn parent_node_is_shadow_root(&self) -> bool {
        false
    }

    fn containing_shadow_host(&self) -> Option<Self> {
        None
    }

    fn is_pseudo_element(&self) -> bool {
        false
    }

    fn prev_sibling_element(&self) -> Option<Self> {
        self.sibling(self.index.checked_sub(1)?)
    }

    fn next_sibling_element(&self) -> Option<Self> {
        self.sibling(self.index + 1)
    }

    fn first_element_child(&self) -> Option<Self> {
        Self::child_of(&Rc::new(self.clone()), 0)
    }

    fn is_html_element_in_html_document(&self) -> bool {
        // XML: names keep their case
        false
    }

    fn has_local_name(&self, name: &CssString) -> bool {
        self.element.name == name.0
    }

    fn has_namespace(&self, ns: &CssString) -> bool {
        self.element.namespace.as_deref().unwrap_or("") == ns.0
    }

    fn is_same_type(&self, other: &Self) -> bool {
        self.element.name == other.element.name
    }

    fn attr_matches(
        &self,
        _ns: &NamespaceConstraint<&CssString>,
        local_name: &CssString,
        operation: &AttrSelectorOperation<&CssString>,
    ) -> bool {
        // Attributes are looked up by their qualified name as written
        self.element
            .attr(&local_name.0)
            .is_some_and(|value| operation.eval_str(value))
    }

    fn match_non_ts_pseudo_class(
        &self,
        pc: &NonTSPseudoClass,
        _context: &mut MatchingContext<'_, Self::Impl>,
    ) -> bool {
        match *pc {}
    }

    fn match_pseudo_element(
        &self,
        pe: &PseudoElement,
        _context: &mut MatchingContext<'_, Self::Impl>,
    ) -> bool {
        match *pe {}
    }

    fn is_link(&self) -> bool {
        false
    }

    fn is_html_slot_element(&self) -> bool {
        false
    }

    fn has_id(&self, id: &CssString, case_sensitivity: CaseSensitivity) -> bool {
        self.element
            .attr("id")
            .is_some_and(|own| case_sensitivity.eq(own.as_bytes(), id.0.as_bytes()))
    }

    fn has_class(&self, name: &CssString, case_sensitivity: CaseSensitivity) -> bool {
        self.element.attr("class").is_some_and(|classes| {
            classes
                .split_whitespace()
                .any(|c| case_sensitivity.eq(c.as_bytes(), name.0.as_bytes()))
        })
    }

    fn imported_part(&self, _name: &CssString) -> Option<CssString> {
        None
    }

    fn is_part(&self, _name: &CssString) -> bool {
        false
    }

    fn is_empty(&self) -> bool {
        self.element.elements().next().is_none() && self.element.text().trim().is_empty()
    }

    fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    fn apply_selector_flags(&self, _flags: ElementSelectorFlags) {}

    fn add_element_unique_hashes(&self, _filter: &mut selectors::bloom::BloomFilter) -> bool {
        false
    }

    fn has_custom_state(&self, _name: &CssString) -> bool {
        false
    }
}
