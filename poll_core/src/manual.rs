/*!

This is the long-form manual for `poll_core` and `polladmin`.

## Voter identifiers

Voters are identified by their RUT: a number of 7 or 8 digits and a check
character (`0`-`9` or `k`). Dots, hyphens and surrounding spaces are
ignored, as is the case of `k`, so `12.345.678-5`, `12345678-5` and
`123456785` are the same identifier. Identifiers are stored and exported in
the form `12.345.678-5`.

```bash
polladmin validate-rut 12.345.678-5 10000013K
polladmin format-rut 123456785
```

## Poll file

`polladmin` reads the poll from a JSON file with the same shape as the one
kept by the browser console:

```json
{
  "pregunta": "¿Cuál es tu opción preferida?",
  "opciones": ["Opción 1", "Opción 2", "Opción 3"],
  "fechaInicio": "2024-05-01T09:00:00.000Z",
  "fechaFin": null,
  "estado": "activa",
  "votos": [
    { "rut": "12.345.678-5", "opcionIndex": 0, "fecha": "2024-05-01T10:00:00.000Z", "ip": "10.0.0.1" }
  ]
}
```

Every field is optional. A missing question or missing options take the
console defaults. `estado` is one of `activa`, `pausada`, `finalizada`.
A poll has between 2 and 10 options.

## Output formats

### Results

```text
"Opción","Votos","Porcentaje"
"Opción 1","2","67%"
"Opción 2","1","33%"
"Opción 3","0","0%"
```

Percentages are rounded to the closest integer, halves going up.

### Votes

```text
"ID","RUT","Opción","Fecha","Dirección IP"
"1","12.345.678-5","Opción 1","2024-05-01T10:00:00.000Z","10.0.0.1"
```

Votes for an option that no longer exists are listed as `Desconocida`.
A missing address is written as `No disponible`.

### Encoding rules

- every column name and every value is quoted, with inner quotes doubled
- every line ends with a newline, the last one included

## Importing

`polladmin import <file>` reads a CSV file and prints its rows as JSON. The
default reader follows the usual CSV quoting rules, so values may contain
commas, quotes and line breaks.

`--legacy` switches to the line-based reader of older tools: the file is
split on line breaks first, then each line is cut with a pattern that
accepts quoted spans (single or double quotes) or runs without commas and
spaces. It cannot read values spanning several lines, and doubled quotes
are kept as they are.

Both readers skip blank lines, give an empty value to columns missing from
a row and ignore extra values.

 */
