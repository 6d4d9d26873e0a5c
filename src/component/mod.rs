pub mod contact_sheet_generator;
