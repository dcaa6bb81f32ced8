mod tests_document;
