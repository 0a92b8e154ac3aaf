
#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Lookup { rollno: Option<String> },
    Add,
    Average,
    List { column: Option<String>, ascending: Option<bool> },
    Help,
    Quit,
}
