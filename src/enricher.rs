use tracing::warn;

use crate::catalog::ReferenceCardCatalog;
use crate::models::deck::EnrichedCardLine;
use crate::models::decklist::CardLine;

/// Left-joins decklist rows against the catalog by canonical name.
/// Rows that do not resolve are kept with no metadata.
pub fn enrich(lines: Vec<CardLine>, catalog: &ReferenceCardCatalog) -> Vec<EnrichedCardLine> {
    lines
        .into_iter()
        .map(|line| {
            let card = catalog.get(&line.name);
            if card.is_none() {
                match catalog.suggest(&line.name) {
                    Some(suggestion) => warn!(
                        "Unresolved card {:?}, closest catalog name is {:?}",
                        line.name, suggestion
                    ),
                    None => warn!("Unresolved card {:?}", line.name),
                }
            }
            EnrichedCardLine { line, card }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::tests::sample_catalog;
    use crate::models::decklist::Zone;

    #[test]
    fn test_enrich_split_card_uses_front_face() {
        let catalog = sample_catalog();
        let enriched = enrich(vec![CardLine::new("Fire // Ice", 2, Zone::Main)], &catalog);

        assert_eq!(enriched.len(), 1);
        let card = enriched[0].card.as_ref().unwrap();
        assert_eq!(card.name, "Fire");
        assert_eq!(card.mana_cost.as_deref(), Some("{1}{R}"));
        assert_eq!(enriched[0].name(), "Fire // Ice");
    }

    #[test]
    fn test_enrich_keeps_unresolved_rows() {
        let catalog = sample_catalog();
        let enriched = enrich(
            vec![
                CardLine::new("Island", 20, Zone::Main),
                CardLine::new("Totally Unknown Card", 4, Zone::Main),
                CardLine::new("Counterspell", 2, Zone::Side),
            ],
            &catalog,
        );

        assert_eq!(enriched.len(), 3);
        assert!(enriched[0].is_resolved());
        assert!(!enriched[1].is_resolved());
        assert_eq!(enriched[1].quantity(), 4);
        assert_eq!(enriched[2].zone(), Zone::Side);
    }

    #[test]
    fn test_enrich_against_empty_catalog() {
        let catalog = ReferenceCardCatalog::default();
        let enriched = enrich(vec![CardLine::new("Island", 1, Zone::Main)], &catalog);
        assert!(!enriched[0].is_resolved());
    }
}
