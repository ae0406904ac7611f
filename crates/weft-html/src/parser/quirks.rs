//! [§ 13.2.6.4.1 The "initial" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-initial-insertion-mode)
//!
//! Document mode selection from the DOCTYPE token.

use weft_dom::QuirksMode;

use crate::tokenizer::Doctype;

/// "The public identifier is set to: ..."
const QUIRKY_PUBLIC_IDENTIFIERS: &[&str] = &[
    "-//W3O//DTD W3 HTML Strict 3.0//EN//",
    "-/W3C/DTD HTML 4.0 Transitional/EN",
    "HTML",
];

const QUIRKY_SYSTEM_IDENTIFIER: &str = "http://www.ibm.com/data/dtd/v11/ibmxhtml1-transitional.dtd";

/// "The public identifier starts with: ..."
const QUIRKY_PUBLIC_IDENTIFIER_PREFIXES: &[&str] = &[
    "+//Silmaril//dtd html Pro v0r11 19970101//",
    "-//AS//DTD HTML 3.0 asWedit + extensions//",
    "-//AdvaSoft Ltd//DTD HTML 3.0 asWedit + extensions//",
    "-//IETF//DTD HTML 2.0 Level 1//",
    "-//IETF//DTD HTML 2.0 Level 2//",
    "-//IETF//DTD HTML 2.0 Strict Level 1//",
    "-//IETF//DTD HTML 2.0 Strict Level 2//",
    "-//IETF//DTD HTML 2.0 Strict//",
    "-//IETF//DTD HTML 2.0//",
    "-//IETF//DTD HTML 2.1E//",
    "-//IETF//DTD HTML 3.0//",
    "-//IETF//DTD HTML 3.2 Final//",
    "-//IETF//DTD HTML 3.2//",
    "-//IETF//DTD HTML 3//",
    "-//IETF//DTD HTML Level 0//",
    "-//IETF//DTD HTML Level 1//",
    "-//IETF//DTD HTML Level 2//",
    "-//IETF//DTD HTML Level 3//",
    "-//IETF//DTD HTML Strict Level 0//",
    "-//IETF//DTD HTML Strict Level 1//",
    "-//IETF//DTD HTML Strict Level 2//",
    "-//IETF//DTD HTML Strict Level 3//",
    "-//IETF//DTD HTML Strict//",
    "-//IETF//DTD HTML//",
    "-//Metrius//DTD Metrius Presentational//",
    "-//Microsoft//DTD Internet Explorer 2.0 HTML Strict//",
    "-//Microsoft//DTD Internet Explorer 2.0 HTML//",
    "-//Microsoft//DTD Internet Explorer 2.0 Tables//",
    "-//Microsoft//DTD Internet Explorer 3.0 HTML Strict//",
    "-//Microsoft//DTD Internet Explorer 3.0 HTML//",
    "-//Microsoft//DTD Internet Explorer 3.0 Tables//",
    "-//Netscape Comm. Corp.//DTD HTML//",
    "-//Netscape Comm. Corp.//DTD Strict HTML//",
    "-//O'Reilly and Associates//DTD HTML 2.0//",
    "-//O'Reilly and Associates//DTD HTML Extended 1.0//",
    "-//O'Reilly and Associates//DTD HTML Extended Relaxed 1.0//",
    "-//SQ//DTD HTML 2.0 HoTMetaL + extensions//",
    "-//SoftQuad Software//DTD HoTMetaL PRO 6.0::19990601::extensions to HTML 4.0//",
    "-//SoftQuad//DTD HoTMetaL PRO 4.0::19971010::extensions to HTML 4.0//",
    "-//Spyglass//DTD HTML 2.0 Extended//",
    "-//Sun Microsystems Corp.//DTD HotJava HTML//",
    "-//Sun Microsystems Corp.//DTD HotJava Strict HTML//",
    "-//W3C//DTD HTML 3 1995-03-24//",
    "-//W3C//DTD HTML 3.2 Draft//",
    "-//W3C//DTD HTML 3.2 Final//",
    "-//W3C//DTD HTML 3.2//",
    "-//W3C//DTD HTML 3.2S Draft//",
    "-//W3C//DTD HTML 4.0 Frameset//",
    "-//W3C//DTD HTML 4.0 Transitional//",
    "-//W3C//DTD HTML Experimental 19960712//",
    "-//W3C//DTD HTML Experimental 970421//",
    "-//W3C//DTD W3 HTML//",
    "-//W3O//DTD W3 HTML 3.0//",
    "-//WebTechs//DTD Mozilla HTML 2.0//",
    "-//WebTechs//DTD Mozilla HTML//",
];

/// HTML 4.01 Frameset and Transitional: quirks without a system identifier,
/// limited quirks with one.
const HTML4_FRAMESET_OR_TRANSITIONAL_PREFIXES: &[&str] = &[
    "-//W3C//DTD HTML 4.01 Frameset//",
    "-//W3C//DTD HTML 4.01 Transitional//",
];

/// XHTML 1.0 Frameset and Transitional: always limited quirks.
const LIMITED_QUIRKS_PUBLIC_IDENTIFIER_PREFIXES: &[&str] = &[
    "-//W3C//DTD XHTML 1.0 Frameset//",
    "-//W3C//DTD XHTML 1.0 Transitional//",
];

fn starts_with_ignore_ascii_case(value: &str, prefix: &str) -> bool {
    value
        .get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

/// "If the document is not an iframe srcdoc document, and the parser cannot
/// change the mode flag is false, and the DOCTYPE token matches one of the
/// conditions in the following list, then set the Document to quirks mode:
/// ... Otherwise, if ... the DOCTYPE token matches one of the conditions in
/// the following list, then set the Document to limited-quirks mode: ..."
///
/// "The system identifier and public identifier strings must be compared to
/// the values given in the lists above in an ASCII case-insensitive manner."
#[must_use]
pub fn quirks_mode_for_doctype(doctype: &Doctype) -> QuirksMode {
    let public = doctype.public_identifier.as_deref();
    let system = doctype.system_identifier.as_deref();
    let public_starts_with_any = |prefixes: &[&str]| {
        public.is_some_and(|public| {
            prefixes
                .iter()
                .any(|prefix| starts_with_ignore_ascii_case(public, prefix))
        })
    };

    // "The force-quirks flag is set to on."
    // "The name is not "html"."
    let quirks = doctype.force_quirks
        || doctype.name.as_deref() != Some("html")
        // "The public identifier is set to: ..."
        || public.is_some_and(|public| {
            QUIRKY_PUBLIC_IDENTIFIERS
                .iter()
                .any(|quirky| public.eq_ignore_ascii_case(quirky))
        })
        // "The system identifier is set to:
        // "http://www.ibm.com/data/dtd/v11/ibmxhtml1-transitional.dtd""
        || system.is_some_and(|system| system.eq_ignore_ascii_case(QUIRKY_SYSTEM_IDENTIFIER))
        // "The public identifier starts with: ..."
        || public_starts_with_any(QUIRKY_PUBLIC_IDENTIFIER_PREFIXES)
        // "The system identifier is missing and the public identifier starts
        // with: "-//W3C//DTD HTML 4.01 Frameset//" ..."
        || (system.is_none() && public_starts_with_any(HTML4_FRAMESET_OR_TRANSITIONAL_PREFIXES));
    if quirks {
        return QuirksMode::Quirks;
    }

    // "The public identifier starts with: "-//W3C//DTD XHTML 1.0 Frameset//"
    // ... The system identifier is not missing and the public identifier
    // starts with: "-//W3C//DTD HTML 4.01 Frameset//" ..."
    if public_starts_with_any(LIMITED_QUIRKS_PUBLIC_IDENTIFIER_PREFIXES)
        || (system.is_some() && public_starts_with_any(HTML4_FRAMESET_OR_TRANSITIONAL_PREFIXES))
    {
        return QuirksMode::LimitedQuirks;
    }

    QuirksMode::NoQuirks
}

/// "If the DOCTYPE token's name is not "html", or the token's public
/// identifier is not missing, or the token's system identifier is neither
/// missing nor "about:legacy-compat", then there is a parse error."
#[must_use]
pub fn is_doctype_parse_error(doctype: &Doctype) -> bool {
    doctype.name.as_deref() != Some("html")
        || doctype.public_identifier.is_some()
        || doctype
            .system_identifier
            .as_deref()
            .is_some_and(|system| system != "about:legacy-compat")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doctype(name: &str, public: Option<&str>, system: Option<&str>) -> Doctype {
        Doctype {
            name: Some(name.to_string()),
            public_identifier: public.map(str::to_string),
            system_identifier: system.map(str::to_string),
            force_quirks: false,
        }
    }

    #[test]
    fn test_html5_doctype_is_no_quirks() {
        let html5 = doctype("html", None, None);
        assert_eq!(quirks_mode_for_doctype(&html5), QuirksMode::NoQuirks);
        assert!(!is_doctype_parse_error(&html5));
    }

    #[test]
    fn test_force_quirks_and_wrong_name() {
        let mut forced = doctype("html", None, None);
        forced.force_quirks = true;
        assert_eq!(quirks_mode_for_doctype(&forced), QuirksMode::Quirks);
        assert_eq!(
            quirks_mode_for_doctype(&doctype("svg", None, None)),
            QuirksMode::Quirks
        );
    }

    #[test]
    fn test_legacy_public_identifiers() {
        let html32 = doctype("html", Some("-//W3C//DTD HTML 3.2 Final//EN"), None);
        assert_eq!(quirks_mode_for_doctype(&html32), QuirksMode::Quirks);

        let lowercase = doctype("html", Some("-//w3c//dtd html 3.2 final//en"), None);
        assert_eq!(quirks_mode_for_doctype(&lowercase), QuirksMode::Quirks);

        let exact = doctype("html", Some("html"), None);
        assert_eq!(quirks_mode_for_doctype(&exact), QuirksMode::Quirks);
    }

    #[test]
    fn test_html401_transitional_depends_on_system_identifier() {
        let public = Some("-//W3C//DTD HTML 4.01 Transitional//EN");
        assert_eq!(
            quirks_mode_for_doctype(&doctype("html", public, None)),
            QuirksMode::Quirks
        );
        assert_eq!(
            quirks_mode_for_doctype(&doctype(
                "html",
                public,
                Some("http://www.w3.org/TR/html4/loose.dtd")
            )),
            QuirksMode::LimitedQuirks
        );
    }

    #[test]
    fn test_xhtml_transitional_is_limited_quirks() {
        let xhtml = doctype(
            "html",
            Some("-//W3C//DTD XHTML 1.0 Transitional//EN"),
            Some("http://www.w3.org/TR/xhtml1/DTD/xhtml1-transitional.dtd"),
        );
        assert_eq!(quirks_mode_for_doctype(&xhtml), QuirksMode::LimitedQuirks);
        assert!(is_doctype_parse_error(&xhtml));
    }

    #[test]
    fn test_ibm_system_identifier() {
        let ibm = doctype(
            "html",
            None,
            Some("http://www.ibm.com/data/dtd/v11/ibmxhtml1-transitional.dtd"),
        );
        assert_eq!(quirks_mode_for_doctype(&ibm), QuirksMode::Quirks);
    }

    #[test]
    fn test_legacy_compat_is_not_an_error() {
        let compat = doctype("html", None, Some("about:legacy-compat"));
        assert!(!is_doctype_parse_error(&compat));
        assert_eq!(quirks_mode_for_doctype(&compat), QuirksMode::NoQuirks);
    }
}
