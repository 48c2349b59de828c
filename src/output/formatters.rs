use super::{
    csv_escape, schedule_json, schedule_table, snapshot_json, snapshot_table, write_box_table,
};
use astroday::astro::Almanac;
use astroday::labels::LabelLookup;
use std::io::{self, Write};

/// Writes one command's result in one output format. Both methods return
/// the number of rows written.
pub trait Formatter {
    fn write_snapshot(&mut self, almanac: &Almanac, neighbors: bool) -> io::Result<usize>;
    fn write_schedule(&mut self, almanac: &Almanac) -> io::Result<usize>;
}

pub struct TextFormatter<'a, W: Write> {
    writer: &'a mut W,
    lookup: &'a dyn LabelLookup,
}

impl<'a, W: Write> TextFormatter<'a, W> {
    pub fn new(writer: &'a mut W, lookup: &'a dyn LabelLookup) -> Self {
        Self { writer, lookup }
    }
}

impl<W: Write> Formatter for TextFormatter<'_, W> {
    fn write_snapshot(&mut self, almanac: &Almanac, neighbors: bool) -> io::Result<usize> {
        let (headers, rows) = snapshot_table(almanac, neighbors, self.lookup);
        write_box_table(&mut *self.writer, &headers, &rows)?;
        Ok(rows.len())
    }

    fn write_schedule(&mut self, almanac: &Almanac) -> io::Result<usize> {
        let (headers, rows) = schedule_table(almanac, self.lookup);
        write_box_table(&mut *self.writer, &headers, &rows)?;
        Ok(rows.len())
    }
}

pub struct CsvFormatter<'a, W: Write> {
    writer: &'a mut W,
    lookup: &'a dyn LabelLookup,
    headers: bool,
}

impl<'a, W: Write> CsvFormatter<'a, W> {
    pub fn new(writer: &'a mut W, lookup: &'a dyn LabelLookup, headers: bool) -> Self {
        Self {
            writer,
            lookup,
            headers,
        }
    }

    fn write_rows(&mut self, headers: &[String], rows: &[Vec<String>]) -> io::Result<usize> {
        if self.headers {
            let header: Vec<String> = headers.iter().map(|h| csv_escape(&h.to_lowercase())).collect();
            writeln!(self.writer, "{}", header.join(","))?;
        }
        for row in rows {
            let cells: Vec<String> = row.iter().map(|cell| csv_escape(cell)).collect();
            writeln!(self.writer, "{}", cells.join(","))?;
        }
        Ok(rows.len())
    }
}

impl<W: Write> Formatter for CsvFormatter<'_, W> {
    fn write_snapshot(&mut self, almanac: &Almanac, neighbors: bool) -> io::Result<usize> {
        let (headers, rows) = snapshot_table(almanac, neighbors, self.lookup);
        self.write_rows(&headers, &rows)
    }

    fn write_schedule(&mut self, almanac: &Almanac) -> io::Result<usize> {
        let (headers, rows) = schedule_table(almanac, self.lookup);
        self.write_rows(&headers, &rows)
    }
}

pub struct JsonFormatter<'a, W: Write> {
    writer: &'a mut W,
    lookup: &'a dyn LabelLookup,
}

impl<'a, W: Write> JsonFormatter<'a, W> {
    pub fn new(writer: &'a mut W, lookup: &'a dyn LabelLookup) -> Self {
        Self { writer, lookup }
    }
}

impl<W: Write> Formatter for JsonFormatter<'_, W> {
    fn write_snapshot(&mut self, almanac: &Almanac, neighbors: bool) -> io::Result<usize> {
        writeln!(self.writer, "{}", snapshot_json(almanac, neighbors, self.lookup))?;
        Ok(1)
    }

    fn write_schedule(&mut self, almanac: &Almanac) -> io::Result<usize> {
        let (json, count) = schedule_json(almanac, self.lookup);
        writeln!(self.writer, "{}", json)?;
        Ok(count)
    }
}
