//! Printable entry ticket.
//!
//! The ticket is produced as a list of drawing operations on an A6 page in
//! millimetres, so it can be replayed by whichever PDF backend the client uses.

use serde::Serialize;
use unicode_normalization::UnicodeNormalization;

use crate::answer::readable_answer;
use crate::config::GUEST_PLACEHOLDER;
use crate::summary::ConfirmationSummary;

pub const TICKET_FILE_NAME: &str = "invitacion-qr.pdf";

const PAGE_WIDTH: f64 = 105.0;
const PAGE_HEIGHT: f64 = 148.0;
const MARGIN: f64 = 10.0;
const HEADER_HEIGHT: f64 = 24.0;
const LOGO_SIZE: f64 = 18.0;
const CREDENTIAL_TOP: f64 = 42.0;
const ROW_PITCH: f64 = 4.6;
const PT_TO_MM: f64 = 25.4 / 72.0;

const HEADER_FILL: Rgb = Rgb(252, 224, 157);
const INK: Rgb = Rgb(133, 95, 13);
const FRAME: Rgb = Rgb(211, 176, 102);

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    Normal,
    Bold,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    Left,
    Center,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Element {
    FilledRect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        fill: Rgb,
    },
    RoundedRect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        radius: f64,
        stroke: Rgb,
    },
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        width: f64,
    },
    #[serde(rename_all = "camelCase")]
    Image {
        data_url: String,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    Text {
        lines: Vec<String>,
        x: f64,
        y: f64,
        weight: FontWeight,
        size: f64,
        color: Rgb,
        align: Align,
    },
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TicketDocument {
    pub file_name: &'static str,
    pub width_mm: f64,
    pub height_mm: f64,
    pub elements: Vec<Element>,
}

impl TicketDocument {
    /// All text on the ticket, one entry per rendered line.
    pub fn text_lines(&self) -> Vec<&str> {
        self.elements
            .iter()
            .filter_map(|e| match e {
                Element::Text { lines, .. } => Some(lines),
                _ => None,
            })
            .flatten()
            .map(String::as_str)
            .collect()
    }
}

/// PNG of the scannable code, as a `data:` URL.
#[derive(Debug, Clone)]
pub struct CredentialImage {
    pub data_url: String,
}

pub struct TicketRenderer<'a> {
    title: &'a str,
    logo_data_url: Option<&'a str>,
}

impl<'a> TicketRenderer<'a> {
    pub fn new(title: &'a str) -> Self {
        Self {
            title,
            logo_data_url: None,
        }
    }

    pub fn with_logo(mut self, logo_data_url: Option<&'a str>) -> Self {
        self.logo_data_url = logo_data_url;
        self
    }

    pub fn render(
        &self,
        credential: &CredentialImage,
        name: &str,
        summary: Option<&ConfirmationSummary>,
        seats: u32,
    ) -> TicketDocument {
        let mut page = Page::default();

        page.push(Element::FilledRect {
            x: 0.0,
            y: 0.0,
            width: PAGE_WIDTH,
            height: HEADER_HEIGHT,
            fill: HEADER_FILL,
        });
        if let Some(logo) = self.logo_data_url {
            page.push(Element::Image {
                data_url: logo.to_string(),
                x: PAGE_WIDTH - MARGIN - LOGO_SIZE,
                y: 6.0,
                width: LOGO_SIZE,
                height: LOGO_SIZE * 0.95,
            });
        }
        page.text(self.title, MARGIN, 16.0, FontWeight::Bold, 14.0, Align::Left);

        page.push(Element::RoundedRect {
            x: MARGIN,
            y: 28.0,
            width: PAGE_WIDTH - MARGIN * 2.0,
            height: PAGE_HEIGHT - 38.0,
            radius: 8.0,
            stroke: FRAME,
        });

        let code_size = (PAGE_WIDTH - 70.0).min(PAGE_HEIGHT / 2.5);
        page.push(Element::Image {
            data_url: credential.data_url.clone(),
            x: (PAGE_WIDTH - code_size) / 2.0,
            y: CREDENTIAL_TOP,
            width: code_size,
            height: code_size,
        });

        let mut cursor = CREDENTIAL_TOP + code_size + 12.0;
        let display_name = if name.is_empty() { GUEST_PLACEHOLDER } else { name };
        page.text(display_name, PAGE_WIDTH / 2.0, cursor, FontWeight::Bold, 12.0, Align::Center);

        cursor += 6.0;
        page.text(
            &format!("Lugares confirmados: {}", confirmed_seats(summary, seats)),
            PAGE_WIDTH / 2.0,
            cursor,
            FontWeight::Normal,
            10.0,
            Align::Center,
        );
        cursor += 8.0;

        let Some(summary) = summary else {
            return page.finish();
        };

        if !summary.members.is_empty() {
            page.text("Detalle de confirmación:", MARGIN + 2.0, cursor, FontWeight::Bold, 10.0, Align::Left);
            cursor += 5.0;
            page.push(Element::Line {
                x1: MARGIN + 2.0,
                y1: cursor - 3.0,
                x2: PAGE_WIDTH - MARGIN - 2.0,
                y2: cursor - 3.0,
                width: 0.1,
            });
            for member in &summary.members {
                let label = format!("{}: {}", member.name, readable_answer(&member.answer));
                page.text(&label, MARGIN + 4.0, cursor, FontWeight::Normal, 10.0, Align::Left);
                cursor += ROW_PITCH;
            }
        }

        if !summary.extras.is_empty() {
            cursor += 4.0;
            page.text("Acompañantes extra:", MARGIN + 2.0, cursor, FontWeight::Bold, 10.0, Align::Left);
            cursor += 5.0;
            for extra in &summary.extras {
                page.text(&format!("• {}", extra), MARGIN + 4.0, cursor, FontWeight::Normal, 10.0, Align::Left);
                cursor += ROW_PITCH;
            }
        }

        if let Some(note) = summary.note.as_deref().filter(|n| !n.is_empty()) {
            cursor += 4.0;
            page.text("Mensaje:", MARGIN + 2.0, cursor, FontWeight::Bold, 10.0, Align::Left);
            cursor += 5.0;
            page.push(Element::Text {
                lines: wrap_text(note, PAGE_WIDTH - MARGIN * 2.0 - 4.0, 10.0),
                x: MARGIN + 4.0,
                y: cursor,
                weight: FontWeight::Normal,
                size: 10.0,
                color: INK,
                align: Align::Left,
            });
        }

        page.finish()
    }
}

/// Seats printed on the ticket: the recomputed confirmation count when a
/// summary exists, else the seats held for the party.
pub fn confirmed_seats(summary: Option<&ConfirmationSummary>, seats: u32) -> u32 {
    summary.map(|s| s.confirmed).unwrap_or(seats)
}

#[derive(Default)]
struct Page {
    elements: Vec<Element>,
}

impl Page {
    fn push(&mut self, element: Element) {
        self.elements.push(element);
    }

    fn text(&mut self, text: &str, x: f64, y: f64, weight: FontWeight, size: f64, align: Align) {
        self.push(Element::Text {
            lines: vec![text.to_string()],
            x,
            y,
            weight,
            size,
            color: INK,
            align,
        });
    }

    fn finish(self) -> TicketDocument {
        TicketDocument {
            file_name: TICKET_FILE_NAME,
            width_mm: PAGE_WIDTH,
            height_mm: PAGE_HEIGHT,
            elements: self.elements,
        }
    }
}

/// Greedy word wrap using Helvetica advance widths. Words wider than the
/// line are split between characters.
pub fn wrap_text(text: &str, max_width_mm: f64, size_pt: f64) -> Vec<String> {
    let scale = size_pt * PT_TO_MM / 1000.0;
    let width_of = |s: &str| s.chars().map(char_width).sum::<u32>() as f64 * scale;
    let space = char_width(' ') as f64 * scale;

    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let mut line = String::new();
        let mut line_width = 0.0;

        for word in paragraph.split_whitespace() {
            let word_width = width_of(word);
            let needed = if line.is_empty() { word_width } else { line_width + space + word_width };

            if needed <= max_width_mm {
                if !line.is_empty() {
                    line.push(' ');
                }
                line.push_str(word);
                line_width = needed;
                continue;
            }

            if !line.is_empty() {
                lines.push(std::mem::take(&mut line));
                line_width = 0.0;
            }

            if word_width <= max_width_mm {
                line.push_str(word);
                line_width = word_width;
                continue;
            }

            for c in word.chars() {
                let w = char_width(c) as f64 * scale;
                if line_width + w > max_width_mm && !line.is_empty() {
                    lines.push(std::mem::take(&mut line));
                    line_width = 0.0;
                }
                line.push(c);
                line_width += w;
            }
        }
        lines.push(line);
    }
    lines
}

// Helvetica widths in 1/1000 em for printable ASCII, starting at ' '.
const HELVETICA_WIDTHS: [u32; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // '0'..'?'
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 'P'..'_'
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // '`'..'o'
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // 'p'..'~'
];

fn char_width(c: char) -> u32 {
    let base = if c.is_ascii() {
        c
    } else {
        // Accented letters take the width of their base letter.
        std::iter::once(c).nfd().next().unwrap_or(c)
    };
    match base as u32 {
        code @ 32..=126 => HELVETICA_WIDTHS[(code - 32) as usize],
        _ => 556,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Member;
    use crate::summary::SummaryKind;

    fn credential() -> CredentialImage {
        CredentialImage {
            data_url: "data:image/png;base64,AAAA".to_string(),
        }
    }

    fn summary() -> ConfirmationSummary {
        ConfirmationSummary {
            kind: SummaryKind::Grupo,
            submitted_at: None,
            note: Some("¡Muchas felicidades a los dos! Nos vemos en Antigua para celebrar juntos este gran día.".into()),
            guests: 7,
            confirmed: 3,
            confirmed_members: 2,
            members: vec![
                Member { name: "Ana".into(), answer: "Sí".into() },
                Member { name: "Luis".into(), answer: "No".into() },
                Member { name: "Marta".into(), answer: "".into() },
                Member { name: "Rosa".into(), answer: "Llego tarde".into() },
                Member { name: "Beto".into(), answer: "yes".into() },
            ],
            extras: vec!["Pedro".into()],
            hash: None,
        }
    }

    #[test]
    fn test_ticket_without_summary() {
        let doc = TicketRenderer::new("Boda Marielos & Guillermo").render(&credential(), "", None, 4);

        assert_eq!(doc.file_name, "invitacion-qr.pdf");
        assert_eq!((doc.width_mm, doc.height_mm), (105.0, 148.0));
        assert_eq!(
            doc.text_lines(),
            vec!["Boda Marielos & Guillermo", "Invitado/a", "Lugares confirmados: 4"]
        );
        // No logo: header band, frame and credential only
        let images = doc.elements.iter().filter(|e| matches!(e, Element::Image { .. })).count();
        assert_eq!(images, 1);
    }

    #[test]
    fn test_credential_is_centred() {
        let doc = TicketRenderer::new("T").render(&credential(), "Ana", None, 1);
        let image = doc
            .elements
            .iter()
            .find_map(|e| match e {
                Element::Image { x, y, width, height, .. } => Some((*x, *y, *width, *height)),
                _ => None,
            })
            .unwrap();
        assert_eq!(image, (35.0, 42.0, 35.0, 35.0));
    }

    #[test]
    fn test_logo_sits_in_header() {
        let doc = TicketRenderer::new("T")
            .with_logo(Some("data:image/png;base64,TE9HTw=="))
            .render(&credential(), "Ana", None, 1);
        match &doc.elements[1] {
            Element::Image { x, y, width, .. } => {
                assert_eq!((*x, *y, *width), (77.0, 6.0, 18.0));
            }
            other => panic!("expected logo, got {:?}", other),
        }
    }

    #[test]
    fn test_ticket_sections() {
        let summary = summary();
        let doc = TicketRenderer::new("T").render(&credential(), "Familia Pérez", Some(&summary), 9);
        let lines = doc.text_lines();

        assert!(lines.contains(&"Lugares confirmados: 3"));
        assert!(lines.contains(&"Detalle de confirmación:"));
        assert!(lines.contains(&"Ana: Sí"));
        assert!(lines.contains(&"Luis: No"));
        assert!(lines.contains(&"Marta: No"));
        assert!(lines.contains(&"Rosa: Llego tarde"));
        assert!(lines.contains(&"Beto: Sí"));
        assert!(lines.contains(&"Acompañantes extra:"));
        assert!(lines.contains(&"• Pedro"));
        assert!(lines.contains(&"Mensaje:"));

        let note_lines = match doc.elements.last().unwrap() {
            Element::Text { lines, .. } => lines.clone(),
            other => panic!("expected note text, got {:?}", other),
        };
        assert!(note_lines.len() > 1);
        assert_eq!(note_lines.join(" "), summary.note.clone().unwrap());
    }

    #[test]
    fn test_sections_skipped_when_empty() {
        let mut summary = summary();
        summary.members.clear();
        summary.extras.clear();
        summary.note = None;
        let doc = TicketRenderer::new("T").render(&credential(), "Ana", Some(&summary), 2);
        assert_eq!(doc.text_lines(), vec!["T", "Ana", "Lugares confirmados: 3"]);
    }

    #[test]
    fn test_wrap_text_fits_width() {
        let width = 81.0;
        let lines = wrap_text("palabra ".repeat(30).trim(), width, 10.0);
        assert!(lines.len() > 1);
        for line in &lines {
            let measured: u32 = line.chars().map(char_width).sum();
            assert!(measured as f64 * 10.0 * PT_TO_MM / 1000.0 <= width);
        }
    }

    #[test]
    fn test_wrap_text_breaks_long_words_and_keeps_paragraphs() {
        let lines = wrap_text(&"m".repeat(60), 20.0, 10.0);
        assert!(lines.len() > 1);
        assert_eq!(lines.concat(), "m".repeat(60));

        assert_eq!(wrap_text("uno\ndos", 80.0, 10.0), vec!["uno", "dos"]);
    }

    #[test]
    fn test_accented_letters_use_base_width() {
        assert_eq!(char_width('é'), char_width('e'));
        assert_eq!(char_width('Ñ'), char_width('N'));
    }
}
