use url::form_urlencoded::byte_serialize;

const MAPS_SEARCH_BASE: &str = "https://www.google.com/maps/search/";

/// Google Maps search link for a named place at a destination.
///
/// Spaces become `+`; every other reserved character is percent-encoded.
pub fn search_link(name: &str, destination: &str) -> String {
    let query = format!("{} {}", name.trim(), destination.trim());
    let encoded: String = byte_serialize(query.trim().as_bytes()).collect();
    format!("{MAPS_SEARCH_BASE}{encoded}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    #[test]
    fn spaces_become_plus() {
        assert_eq!(
            search_link("Hotel Le Marais", "Paris France"),
            "https://www.google.com/maps/search/Hotel+Le+Marais+Paris+France"
        );
    }

    #[test]
    fn reserved_characters_are_encoded() {
        let link = search_link("Bed & Breakfast/Rooftop", "São Paulo");
        assert_eq!(
            link,
            "https://www.google.com/maps/search/Bed+%26+Breakfast%2FRooftop+S%C3%A3o+Paulo"
        );

        let parsed = Url::parse(&link).unwrap();
        assert_eq!(parsed.host_str(), Some("www.google.com"));
        assert_eq!(parsed.path_segments().unwrap().count(), 3);
    }

    #[test]
    fn same_inputs_give_same_link() {
        assert_eq!(
            search_link(" Generator ", "Rome"),
            search_link("Generator", " Rome ")
        );
    }
}
