/*!
 * Rendering of drive listings
 *
 * Plain listings print one name per line; long listings use the tabled
 * library for clean, consistent table rendering.
 */

use tabled::{
    settings::{object::Columns, Alignment, Modify, Padding, Style},
    Table, Tabled,
};

use crate::actions::Listing;
use crate::lookup::FolderTree;
use crate::types::{ChildItem, ItemKind, ItemRef};

/// Format of the listing output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingFormat {
    /// Names only, folders with a trailing slash
    Plain,
    /// Table with kind, size, modification date and name
    Long,
}

/// Renders listings produced by `ls`
pub struct Reporter {
    format: ListingFormat,
}

#[derive(Tabled)]
struct ItemRow {
    #[tabled(rename = "Type")]
    kind: String,

    #[tabled(rename = "Size")]
    size: String,

    #[tabled(rename = "Modified")]
    modified: String,

    #[tabled(rename = "Name")]
    name: String,
}

impl Reporter {
    /// Create a new reporter
    pub fn new(format: ListingFormat) -> Self {
        Self { format }
    }

    /// Render every listing; several listings get a header line each
    pub fn render(&self, listings: &[Listing]) -> String {
        let with_headers = listings.len() > 1;

        listings
            .iter()
            .map(|listing| {
                let body = self.render_listing(listing);
                if with_headers {
                    format!("{}:\n{}", listing.path(), body)
                } else {
                    body
                }
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    fn render_listing(&self, listing: &Listing) -> String {
        match listing {
            Listing::Folder { details, .. } => self.render_items(details.items()),
            Listing::Matches { items, .. } => self.render_items(items),
            Listing::File { item, .. } => self.render_items(&[ChildItem::File(item.clone())]),
            Listing::Tree { tree, .. } => {
                let mut lines = Vec::new();
                render_tree(tree, "", &mut lines);
                lines.join("\n")
            }
        }
    }

    fn render_items(&self, items: &[ChildItem]) -> String {
        match self.format {
            ListingFormat::Plain => items
                .iter()
                .map(display_name)
                .collect::<Vec<_>>()
                .join("\n"),
            ListingFormat::Long => {
                let rows: Vec<ItemRow> = items.iter().map(item_row).collect();

                let mut table = Table::new(rows);
                table
                    .with(Style::rounded())
                    .with(Padding::new(1, 1, 0, 0))
                    .with(Modify::new(Columns::new(..)).with(Alignment::left()));

                table.to_string()
            }
        }
    }
}

fn display_name(child: &ChildItem) -> String {
    if child.is_folder_like() {
        format!("{}/", child.file_name())
    } else {
        child.file_name()
    }
}

fn item_row(child: &ChildItem) -> ItemRow {
    let item: &ItemRef = child.item();

    ItemRow {
        kind: match child.kind() {
            ItemKind::Folder => "folder",
            ItemKind::AppLibrary => "app",
            ItemKind::File => "file",
        }
        .to_string(),
        size: item.size.map(format_size).unwrap_or_default(),
        modified: item
            .date_modified
            .map(|date| date.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default(),
        name: display_name(child),
    }
}

fn render_tree(tree: &FolderTree, indent: &str, lines: &mut Vec<String>) {
    let items = tree.details().items();

    for (index, child) in items.iter().enumerate() {
        let last = index + 1 == items.len();
        let (branch, nested) = if last {
            ("└── ", "    ")
        } else {
            ("├── ", "│   ")
        };

        lines.push(format!("{}{}{}", indent, branch, display_name(child)));

        if let Some(subtree) = tree
            .children()
            .iter()
            .find(|subtree| subtree.details().drivewsid() == child.drivewsid())
        {
            render_tree(subtree, &format!("{}{}", indent, nested), lines);
        }
    }
}

/// Format a human-readable file size
pub fn format_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{} B", size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::NormalizedPath;
    use crate::types::{Details, DriveId, FolderDetails};

    fn item(id: &str, name: &str, extension: Option<&str>, size: Option<u64>) -> ItemRef {
        ItemRef {
            drivewsid: DriveId::new(id),
            docwsid: String::new(),
            zone: String::new(),
            name: name.to_string(),
            extension: extension.map(str::to_string),
            etag: "e".to_string(),
            size,
            date_modified: None,
        }
    }

    fn folder(id: &str, name: &str, items: Vec<ChildItem>) -> Details {
        Details::Folder(FolderDetails {
            drivewsid: DriveId::new(id),
            name: name.to_string(),
            extension: None,
            etag: "e".to_string(),
            parent_id: None,
            items,
        })
    }

    #[test]
    fn test_plain_listing() {
        let listing = Listing::Folder {
            path: NormalizedPath::new("/docs"),
            details: folder(
                "FOLDER::docs",
                "docs",
                vec![
                    ChildItem::Folder(item("FOLDER::a", "archive", None, None)),
                    ChildItem::File(item("FILE::n", "note", Some("md"), Some(10))),
                ],
            ),
        };

        let output = Reporter::new(ListingFormat::Plain).render(&[listing]);
        assert_eq!(output, "archive/\nnote.md");
    }

    #[test]
    fn test_long_listing_has_sizes() {
        let listing = Listing::File {
            path: NormalizedPath::new("/note.md"),
            item: item("FILE::n", "note", Some("md"), Some(2048)),
        };

        let output = Reporter::new(ListingFormat::Long).render(&[listing]);
        assert!(output.contains("Size"));
        assert!(output.contains("2.00 KB"));
        assert!(output.contains("note.md"));
    }

    #[test]
    fn test_tree_listing() {
        let docs = folder(
            "FOLDER::docs",
            "docs",
            vec![ChildItem::File(item("FILE::n", "note", Some("md"), None))],
        );
        let root = Details::Root(FolderDetails {
            drivewsid: DriveId::root(),
            name: String::new(),
            extension: None,
            etag: "r".to_string(),
            parent_id: None,
            items: vec![
                ChildItem::Folder(item("FOLDER::docs", "docs", None, None)),
                ChildItem::File(item("FILE::t", "todo", Some("txt"), None)),
            ],
        });

        let tree = FolderTree::Deep {
            details: root,
            children: vec![FolderTree::Shallow { details: docs }],
        };
        let listing = Listing::Tree {
            path: NormalizedPath::root(),
            tree,
        };

        let output = Reporter::new(ListingFormat::Plain).render(&[listing]);
        assert_eq!(output, "├── docs/\n│   └── note.md\n└── todo.txt");
    }

    #[test]
    fn test_multiple_listings_have_headers() {
        let a = Listing::File {
            path: NormalizedPath::new("/a.txt"),
            item: item("FILE::a", "a", Some("txt"), None),
        };
        let b = Listing::File {
            path: NormalizedPath::new("/b.txt"),
            item: item("FILE::b", "b", Some("txt"), None),
        };

        let output = Reporter::new(ListingFormat::Plain).render(&[a, b]);
        assert_eq!(output, "/a.txt:\na.txt\n\n/b.txt:\nb.txt");
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(1536), "1.50 KB");
        assert_eq!(format_size(5 * 1024 * 1024), "5.00 MB");
    }
}
