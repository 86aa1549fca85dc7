//! Token to fragment serialisation.

use crate::fragment::{FragmentBuilder, UrlFragment};

use super::{HistoryToken, SpreadsheetAction, SpreadsheetListAction};

pub(super) fn url_fragment(token: &HistoryToken) -> UrlFragment {
    let mut b = FragmentBuilder::new();
    match token {
        HistoryToken::SpreadsheetCreate => {
            b.segment("create");
        }
        HistoryToken::SpreadsheetList(action) => match action {
            SpreadsheetListAction::Select(oc) => {
                if !oc.is_empty() {
                    b.segment("*").raw(&oc.to_string());
                }
            }
            SpreadsheetListAction::Reload(oc) => {
                b.segment("*").raw(&oc.to_string()).segment("reload");
            }
            SpreadsheetListAction::RenameSelect(id) => {
                b.segment("rename").segment(id);
            }
            SpreadsheetListAction::RenameSave(id, name) => {
                b.segment("rename").segment(id).segment(name);
            }
            SpreadsheetListAction::Delete(id) => {
                b.segment("delete").segment(id);
            }
        },
        HistoryToken::SpreadsheetLoad(id) => {
            b.segment(id);
        }
        HistoryToken::Plugin(t) => t.write_fragment(&mut b),
        _ => {
            // Every remaining family is scoped to an open spreadsheet.
            if let Some(sheet) = token.sheet() {
                b.segment(sheet.id()).segment(sheet.name());
            }
            match token {
                HistoryToken::Spreadsheet(t) => match t.action() {
                    SpreadsheetAction::Select => {}
                    SpreadsheetAction::RenameSelect => {
                        b.segment("rename");
                    }
                    SpreadsheetAction::RenameSave(name) => {
                        b.segments(["rename", "save"]).segment(name);
                    }
                    SpreadsheetAction::Reload => {
                        b.segment("reload");
                    }
                    SpreadsheetAction::Delete => {
                        b.segment("delete");
                    }
                    SpreadsheetAction::Navigate(list) => {
                        b.segment("navigate");
                        if !list.is_empty() {
                            b.segment(list);
                        }
                    }
                },
                HistoryToken::Cell(t) => t.write_fragment(&mut b),
                HistoryToken::ColumnOrRow(t) => t.write_fragment(&mut b),
                HistoryToken::LabelMapping(t) => t.write_fragment(&mut b),
                HistoryToken::Metadata(t) => t.write_fragment(&mut b),
                HistoryToken::Form(t) => t.write_fragment(&mut b),
                _ => {}
            }
        }
    }
    b.build()
}

#[cfg(test)]
mod tests {
    use crate::payload::OffsetAndCount;
    use crate::reference::{SpreadsheetId, SpreadsheetName, SpreadsheetSelection};
    use crate::token::{CellAction, HistoryToken};

    fn id() -> SpreadsheetId {
        SpreadsheetId::new(1)
    }

    fn name() -> SpreadsheetName {
        SpreadsheetName::new("Untitled").unwrap()
    }

    #[test]
    fn list_fragments() {
        assert_eq!(
            HistoryToken::spreadsheet_list_select(OffsetAndCount::EMPTY).url_fragment().value(),
            "/"
        );
        let oc = OffsetAndCount::with(Some(10), Some(20)).unwrap();
        assert_eq!(
            HistoryToken::spreadsheet_list_select(oc).url_fragment().value(),
            "/*/offset/10/count/20"
        );
        assert_eq!(
            HistoryToken::spreadsheet_list_reload(OffsetAndCount::EMPTY).url_fragment().value(),
            "/*/reload"
        );
    }

    #[test]
    fn cell_fragments() {
        let selection = SpreadsheetSelection::parse_cell("A1").unwrap().set_default_anchor();
        let t = HistoryToken::cell(id(), name(), selection, CellAction::FormulaSave("=1+2".into())).unwrap();
        assert_eq!(t.url_fragment().value(), "/1/Untitled/cell/A1/formula/save/=1+2");
        assert_eq!(t.to_string(), "/1/Untitled/cell/A1/formula/save/=1+2");
    }
}
