//! crates/shift_watch_core/src/catalog.rs
//!
//! Committee names as shown on the portal, mapped to the portal's numeric ids.

/// Id the portal uses for "all committees".
pub const ALL_COMMITTEES: u32 = 0;

/// Static name-to-id table. The names are the portal's own labels, emoji included.
pub static SHIFT_CATALOG: &[(&str, u32)] = &[
    ("-- All committees' --", ALL_COMMITTEES),
    ("🥕 Carrot 🥕", 7),
    ("Receiving: Lifting 🚚", 2),
    ("Receiving: Stocking 📦", 5),
    ("Bathroom Cleaning Plus 🚽", 110),
    ("Cart Return and Sidewalk Maintenance 🛒", 4),
    ("Case Maintenance 🧽", 1),
    ("** Cash Drawer Counting 💰", 114),
    ("** Cashier 💵", 38),
    ("Checkout 💳", 58),
    ("CHIPS Food Drive 🍛", 142),
    ("Cleaning Bulk Bins 🧼", 126),
    ("Cleaning 🏝", 78),
    ("** Enrollment Data Entry and Photo Processing ⌨️", 134),
    ("Entrance Desk 🎟", 54),
    ("Flex Worker 🥫", 56),
    ("Food Processing: Bulk Packaging & Stocking 🍿", 48),
    ("** Food Processing: Bulk Team Leader 🍿", 146),
    ("Food Processing: Cheese & Olive Packaging 🧀", 94),
    ("** Food Processing: Cheese & Olive Team Leader 🧀", 130),
    ("** Front End Support 👀", 64),
    ("General Meeting for workslot credit 🗳️", 159),
    ("Inventory 📋", 6),
    ("** Inventory: Data entry 🖥", 50),
    ("Inventory: Produce 🍀", 72),
    ("** Morning Set-up & Equipment Cleaning 🧺", 40),
    ("** New Member Enrollment 📃", 106),
    ("Office 📗", 62),
    ("** Receiving: Beer Stocking 🍺", 44),
    ("Receiving: Bread Stocking 🍞", 74),
    ("Receiving: Bulk Lifting 🫘", 174),
    ("Receiving: Dairy Lifting 🥛", 172),
    ("Receiving: Health and Beauty Support 🧴", 102),
    ("Receiving: Meat Processing and Lifting 🍖", 42),
    ("Receiving: Produce Lifting and Stocking 🥦", 150),
    ("Receiving: Produce Processing 🥬", 90),
    ("** Receiving: Team Leader 📦", 157),
    ("Receiving: Turkey Runner 🦃", 98),
    ("Receiving: Vitamins 🍬", 46),
    ("Repairs 🛠", 52),
    ("** Scanning Invoices 🖨", 3),
    ("Sorting and Collating Documents 🗂", 68),
    ("Soup Kitchen Volunteer Appreciation Event 🎉", 169),
    ("Soup Kitchen: Deep-Cleaning", 152),
    ("Soup Kitchen: Food Services 🍲", 86),
    ("Soup Kitchen: Guest Services ✍️", 165),
    ("Soup Kitchen: Reception 🙂", 154),
    ("Special Project: Data Entry", 171),
    ("Voucher Processing 🧾", 122),
];

/// Resolves a shift-type name. Unknown names fall back to [`ALL_COMMITTEES`].
pub fn shift_type_id(name: &str) -> u32 {
    SHIFT_CATALOG
        .iter()
        .find(|(label, _)| *label == name)
        .map(|(_, id)| *id)
        .unwrap_or(ALL_COMMITTEES)
}
