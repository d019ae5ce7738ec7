use std::collections::HashSet;
use std::io::{self, Write};

use crate::cli::Query;
use crate::models::deck::{Deck, EnrichedCardLine};
use crate::models::decklist::Zone;
use crate::pipeline::TournamentReport;
use crate::query::{
    average_quantity, decks_with_archetype, filter_by_archetype, filter_by_card_presence,
    matches_label, metagame,
};
use crate::similarity::most_similar_pairs;

pub fn write_summary<W: Write>(out: &mut W, reports: &[TournamentReport]) -> io::Result<()> {
    let classified: usize = reports.iter().map(|report| report.decks.len()).sum();
    let skipped: usize = reports.iter().map(|report| report.skipped.len()).sum();

    writeln!(out, "{} tournaments, {} decks", reports.len(), classified)?;
    for report in reports {
        writeln!(
            out,
            "  {} ({} decks)",
            report.tournament.name,
            report.decks.len()
        )?;
    }
    if skipped > 0 {
        writeln!(out, "{} decks skipped on malformed lines", skipped)?;
    }
    Ok(())
}

pub fn write_query<W: Write>(out: &mut W, query: &Query, decks: &[Deck]) -> io::Result<()> {
    match query {
        Query::Report { top } => {
            write_metagame(out, decks)?;
            for zone in [Zone::Main, Zone::Side] {
                writeln!(out)?;
                writeln!(out, "Most played ({})", zone)?;
                let lines = decks.iter().flat_map(|deck| deck.zone(zone));
                write_card_counts(out, average_quantity(lines, decks.len()), *top)?;
            }
            Ok(())
        }
        Query::Similar { top } => write_similar(out, decks, *top),
        Query::Cards {
            archetype,
            zone,
            include,
            include_zone,
            exclude,
            exclude_zone,
        } => {
            let (lines, deck_count) = match archetype {
                Some(label) if include.is_empty() && exclude.is_empty() => (
                    filter_by_archetype(decks, label, *zone),
                    decks_with_archetype(decks, label).len(),
                ),
                _ => select_cards(
                    decks,
                    archetype.as_deref(),
                    *zone,
                    (include, *include_zone),
                    (exclude, *exclude_zone),
                ),
            };
            writeln!(out, "{} decks", deck_count)?;
            write_card_counts(out, average_quantity(lines, deck_count), usize::MAX)
        }
    }
}

fn select_cards<'a>(
    decks: &'a [Deck],
    archetype: Option<&str>,
    zone: Zone,
    (include, include_zone): (&HashSet<String>, Zone),
    (exclude, exclude_zone): (&HashSet<String>, Zone),
) -> (Vec<&'a EnrichedCardLine>, usize) {
    let selected: Vec<&Deck> =
        filter_by_card_presence(decks, include, include_zone, exclude, exclude_zone)
            .into_iter()
            .filter(|deck| archetype.map_or(true, |label| matches_label(deck, label)))
            .collect();
    let lines = selected.iter().copied().flat_map(|deck| deck.zone(zone)).collect();
    (lines, selected.len())
}

fn write_metagame<W: Write>(out: &mut W, decks: &[Deck]) -> io::Result<()> {
    writeln!(out, "Metagame ({} decks)", decks.len())?;
    for (name, count, share) in metagame(decks) {
        writeln!(out, "{:>5.1}% {:>4}  {}", share * 100.0, count, name)?;
    }
    Ok(())
}

fn write_card_counts<W: Write>(
    out: &mut W,
    counts: Vec<(String, f64)>,
    top: usize,
) -> io::Result<()> {
    for (name, average) in counts.into_iter().take(top) {
        writeln!(out, "{:>6.2}  {}", average, name)?;
    }
    Ok(())
}

fn write_similar<W: Write>(out: &mut W, decks: &[Deck], top: usize) -> io::Result<()> {
    for (i, j, score) in most_similar_pairs(decks, top) {
        writeln!(
            out,
            "{:.3}  {} ({})  {} ({})",
            score,
            decks[i].id(),
            decks[i].name(),
            decks[j].id(),
            decks[j].name()
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::tests::sample_catalog;
    use crate::enricher::enrich;
    use crate::format_config::{Format, FormatConfig};
    use crate::models::decklist::CardLine;

    fn deck(id: &str, lines: &[(&str, u32, Zone)]) -> Deck {
        let lines = lines
            .iter()
            .map(|(name, quantity, zone)| CardLine::new(name, *quantity, *zone))
            .collect();
        Deck::new(
            id,
            enrich(lines, &sample_catalog()),
            &FormatConfig::for_format(Format::Standard),
        )
    }

    fn field() -> Vec<Deck> {
        vec![
            deck(
                "a",
                &[
                    ("Swamp", 24, Zone::Main),
                    ("Sheoldred, the Apocalypse", 4, Zone::Main),
                    ("Counterspell", 2, Zone::Side),
                ],
            ),
            deck(
                "b",
                &[
                    ("Mountain", 20, Zone::Main),
                    ("Lightning Bolt", 4, Zone::Main),
                ],
            ),
            deck(
                "c",
                &[
                    ("Swamp", 24, Zone::Main),
                    ("Sheoldred, the Apocalypse", 3, Zone::Main),
                    ("Counterspell", 2, Zone::Side),
                ],
            ),
        ]
    }

    fn render(query: &Query, decks: &[Deck]) -> String {
        let mut out = Vec::new();
        write_query(&mut out, query, decks).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_report_lists_metagame_shares() {
        let text = render(&Query::Report { top: 2 }, &field());
        assert!(text.starts_with("Metagame (3 decks)\n"));
        assert!(text.contains(" 66.7%    2  Dimir Midrange\n"));
        assert!(text.contains(" 33.3%    1  Mono-Red Aggro\n"));
        assert!(text.contains("Most played (main)\n 16.00  Swamp\n"));
        assert!(text.contains("Most played (side)\n  1.33  Counterspell\n"));
    }

    #[test]
    fn test_similar_lists_closest_pair_first() {
        let text = render(&Query::Similar { top: 1 }, &field());
        assert_eq!(text, "0.967  a (Dimir Midrange)  c (Dimir Midrange)\n");
    }

    #[test]
    fn test_cards_by_archetype_and_presence() {
        let decks = field();
        let by_archetype = Query::Cards {
            archetype: Some("Dimir Midrange".to_string()),
            zone: Zone::Main,
            include: HashSet::new(),
            include_zone: Zone::Main,
            exclude: HashSet::new(),
            exclude_zone: Zone::Side,
        };
        assert_eq!(
            render(&by_archetype, &decks),
            "2 decks\n 24.00  Swamp\n  3.50  Sheoldred the Apocalypse\n"
        );

        let with_bolt = Query::Cards {
            archetype: None,
            zone: Zone::Main,
            include: HashSet::from(["Lightning Bolt".to_string()]),
            include_zone: Zone::Main,
            exclude: HashSet::new(),
            exclude_zone: Zone::Side,
        };
        assert_eq!(
            render(&with_bolt, &decks),
            "1 decks\n 20.00  Mountain\n  4.00  Lightning Bolt\n"
        );
    }
}
